// src/forms/systems/logic/signoff_handlers.rs
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::{announce_changes, form_not_open, report_failure};
use crate::forms::{
    events::{
        FormDataModifiedEvent, FormOperationFeedback, RequestAddSignoffRole,
        RequestFormRevalidation, RequestRemoveSignoffRole, RequestRenameSignoffRole,
        RequestSetSignoffData,
    },
    resources::FormRegistry,
};
use crate::settings::AppSettings;

pub fn handle_add_signoff_role(
    mut events: EventReader<RequestAddSignoffRole>,
    mut registry: ResMut<FormRegistry>,
    settings: Option<Res<AppSettings>>,
    mut feedback_writer: EventWriter<FormOperationFeedback>,
    mut data_modified_writer: EventWriter<FormDataModifiedEvent>,
    mut revalidate_writer: EventWriter<RequestFormRevalidation>,
) {
    let mut modified: BTreeSet<String> = BTreeSet::new();

    for event in events.read() {
        let Some(session) = registry.session_mut(&event.form_id) else {
            report_failure(
                &mut feedback_writer,
                "Add signoff role",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };
        let signoffs = &mut session.state_mut().signoffs;
        signoffs.add_role(&event.role_name);
        debug!(
            "Added signoff role '{}' to '{}' ({} roles).",
            event.role_name,
            event.form_id,
            signoffs.len()
        );
        modified.insert(event.form_id.clone());
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}

pub fn handle_rename_signoff_role(
    mut events: EventReader<RequestRenameSignoffRole>,
    mut registry: ResMut<FormRegistry>,
    settings: Option<Res<AppSettings>>,
    mut feedback_writer: EventWriter<FormOperationFeedback>,
    mut data_modified_writer: EventWriter<FormDataModifiedEvent>,
    mut revalidate_writer: EventWriter<RequestFormRevalidation>,
) {
    let mut modified: BTreeSet<String> = BTreeSet::new();

    for event in events.read() {
        let Some(session) = registry.session_mut(&event.form_id) else {
            report_failure(
                &mut feedback_writer,
                "Rename signoff role",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };
        match session
            .state_mut()
            .signoffs
            .rename_role(event.index, &event.new_name)
        {
            Ok(()) => {
                modified.insert(event.form_id.clone());
            }
            Err(e) => report_failure(&mut feedback_writer, "Rename signoff role", &event.form_id, &e),
        }
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}

pub fn handle_remove_signoff_role(
    mut events: EventReader<RequestRemoveSignoffRole>,
    mut registry: ResMut<FormRegistry>,
    settings: Option<Res<AppSettings>>,
    mut feedback_writer: EventWriter<FormOperationFeedback>,
    mut data_modified_writer: EventWriter<FormDataModifiedEvent>,
    mut revalidate_writer: EventWriter<RequestFormRevalidation>,
) {
    let mut modified: BTreeSet<String> = BTreeSet::new();

    for event in events.read() {
        let Some(session) = registry.session_mut(&event.form_id) else {
            report_failure(
                &mut feedback_writer,
                "Remove signoff role",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };
        match session.state_mut().signoffs.remove_role(event.index) {
            Ok(removed) => {
                debug!(
                    "Removed signoff role '{}' from '{}'.",
                    removed.role_name, event.form_id
                );
                modified.insert(event.form_id.clone());
            }
            Err(e) => report_failure(&mut feedback_writer, "Remove signoff role", &event.form_id, &e),
        }
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}

/// Stores the opaque signature payload for a role.
pub fn handle_set_signoff_data(
    mut events: EventReader<RequestSetSignoffData>,
    mut registry: ResMut<FormRegistry>,
    settings: Option<Res<AppSettings>>,
    mut feedback_writer: EventWriter<FormOperationFeedback>,
    mut data_modified_writer: EventWriter<FormDataModifiedEvent>,
    mut revalidate_writer: EventWriter<RequestFormRevalidation>,
) {
    let mut modified: BTreeSet<String> = BTreeSet::new();

    for event in events.read() {
        let Some(session) = registry.session_mut(&event.form_id) else {
            report_failure(
                &mut feedback_writer,
                "Set signoff data",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };
        match session
            .state_mut()
            .signoffs
            .set_data(event.index, event.payload.clone())
        {
            Ok(()) => {
                modified.insert(event.form_id.clone());
            }
            Err(e) => report_failure(&mut feedback_writer, "Set signoff data", &event.form_id, &e),
        }
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}
