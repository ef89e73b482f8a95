// src/forms/systems/logic/appendix_handlers.rs
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::{announce_changes, form_not_open, report_failure};
use crate::forms::{
    events::{
        FormDataModifiedEvent, FormOperationFeedback, RequestAddCustomField, RequestAttachFile,
        RequestFormRevalidation, RequestRemoveAttachment, RequestRemoveCustomField,
    },
    resources::FormRegistry,
};
use crate::settings::AppSettings;

pub fn handle_attach_file(
    mut events: EventReader<RequestAttachFile>,
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
                "Attach file",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };
        session.state_mut().add_attachment(event.attachment.clone());
        debug!(
            "Attached '{}' to '{}'.",
            event.attachment.name, event.form_id
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

pub fn handle_remove_attachment(
    mut events: EventReader<RequestRemoveAttachment>,
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
                "Remove attachment",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };
        match session.state_mut().remove_attachment(event.index) {
            Ok(_) => {
                modified.insert(event.form_id.clone());
            }
            Err(e) => report_failure(&mut feedback_writer, "Remove attachment", &event.form_id, &e),
        }
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}

pub fn handle_add_custom_field(
    mut events: EventReader<RequestAddCustomField>,
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
                "Add custom field",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };
        session
            .state_mut()
            .add_custom_field(&event.label, &event.value);
        modified.insert(event.form_id.clone());
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}

pub fn handle_remove_custom_field(
    mut events: EventReader<RequestRemoveCustomField>,
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
                "Remove custom field",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };
        match session.state_mut().remove_custom_field(event.index) {
            Ok(removed) => {
                trace!(
                    "Removed custom field '{}' from '{}'.",
                    removed.label,
                    event.form_id
                );
                modified.insert(event.form_id.clone());
            }
            Err(e) => report_failure(&mut feedback_writer, "Remove custom field", &event.form_id, &e),
        }
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}
