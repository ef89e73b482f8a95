// src/forms/systems/logic/add_row.rs
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::{announce_changes, form_not_open, report_failure};
use crate::forms::{
    events::{AddTableRowRequest, FormDataModifiedEvent, FormOperationFeedback, RequestFormRevalidation},
    resources::FormRegistry,
};
use crate::settings::AppSettings;

/// Appends a template row to the requested section.
pub fn handle_add_row_request(
    mut events: EventReader<AddTableRowRequest>,
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
                "Add row",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };

        match session.table(&event.section) {
            Ok(mut editor) => {
                let id = editor.add_row();
                debug!(
                    "Added row {} to '{}/{}' ({} rows).",
                    id,
                    event.form_id,
                    event.section,
                    editor.table().len()
                );
                modified.insert(event.form_id.clone());
            }
            Err(e) => report_failure(&mut feedback_writer, "Add row", &event.form_id, &e),
        }
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}
