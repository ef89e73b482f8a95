// src/forms/systems/logic/delete_column.rs
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::{announce_changes, form_not_open, report_failure, report_success};
use crate::forms::{
    events::{
        FormDataModifiedEvent, FormOperationFeedback, RequestFormRevalidation,
        RequestRemoveDynamicColumn,
    },
    resources::FormRegistry,
};
use crate::settings::AppSettings;

/// Removes a dynamic column together with its values in every row. Unknown
/// keys are a no-op.
pub fn handle_remove_column_request(
    mut events: EventReader<RequestRemoveDynamicColumn>,
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
                "Remove column",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };

        match session.table(&event.section) {
            Ok(mut editor) => {
                let non_empty = editor
                    .table()
                    .rows
                    .iter()
                    .filter(|r| {
                        r.dynamic_fields
                            .get(&event.key)
                            .map_or(false, |v| !v.is_empty())
                    })
                    .count();
                if editor.remove_column(&event.key) {
                    if non_empty > 0 {
                        warn!(
                            "Removing column '{}' from '{}/{}' discarded {} non-empty value(s).",
                            event.key, event.form_id, event.section, non_empty
                        );
                    }
                    report_success(
                        &mut feedback_writer,
                        format!(
                            "Removed column '{}' from '{}/{}'.",
                            event.key, event.form_id, event.section
                        ),
                    );
                    modified.insert(event.form_id.clone());
                } else {
                    trace!(
                        "Column '{}' not present in '{}/{}'; nothing removed.",
                        event.key,
                        event.form_id,
                        event.section
                    );
                }
            }
            Err(e) => report_failure(&mut feedback_writer, "Remove column", &event.form_id, &e),
        }
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}
