// src/forms/systems/logic/add_column.rs
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::{announce_changes, form_not_open, report_failure, report_success};
use crate::forms::{
    events::{
        FormDataModifiedEvent, FormOperationFeedback, RequestAddDynamicColumn,
        RequestFormRevalidation,
    },
    resources::FormRegistry,
};
use crate::settings::AppSettings;

/// Adds a user-defined column. A duplicate or empty key leaves the table as
/// it was and is reported back as feedback.
pub fn handle_add_column_request(
    mut events: EventReader<RequestAddDynamicColumn>,
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
                "Add column",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };

        let result = session.table(&event.section).and_then(|mut editor| {
            editor.add_column_with_key(&event.label, event.key_override.as_deref())
        });

        match result {
            Ok(column) => {
                report_success(
                    &mut feedback_writer,
                    format!(
                        "Added column '{}' (key '{}') to '{}/{}'.",
                        column.label, column.key, event.form_id, event.section
                    ),
                );
                modified.insert(event.form_id.clone());
            }
            Err(e) => report_failure(&mut feedback_writer, "Add column", &event.form_id, &e),
        }
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}
