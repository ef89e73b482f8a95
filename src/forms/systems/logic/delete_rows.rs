// src/forms/systems/logic/delete_rows.rs
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::{announce_changes, form_not_open, report_failure};
use crate::forms::{
    events::{
        FormDataModifiedEvent, FormOperationFeedback, RequestDeleteTableRows,
        RequestFormRevalidation,
    },
    resources::FormRegistry,
};
use crate::settings::AppSettings;

/// Handles deleting one or more rows, addressed by id so that pending edits
/// to other rows keep pointing at the right row.
pub fn handle_delete_rows_request(
    mut events: EventReader<RequestDeleteTableRows>,
    mut registry: ResMut<FormRegistry>,
    settings: Option<Res<AppSettings>>,
    mut feedback_writer: EventWriter<FormOperationFeedback>,
    mut data_modified_writer: EventWriter<FormDataModifiedEvent>,
    mut revalidate_writer: EventWriter<RequestFormRevalidation>,
) {
    let mut modified: BTreeSet<String> = BTreeSet::new();

    for event in events.read() {
        if event.row_ids.is_empty() {
            trace!(
                "Skipping delete request for '{}/{}': No rows provided.",
                event.form_id,
                event.section
            );
            continue;
        }

        let Some(session) = registry.session_mut(&event.form_id) else {
            report_failure(
                &mut feedback_writer,
                "Delete rows",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };

        let mut editor = match session.table(&event.section) {
            Ok(editor) => editor,
            Err(e) => {
                report_failure(&mut feedback_writer, "Delete rows", &event.form_id, &e);
                continue;
            }
        };

        let mut deleted_count = 0;
        for &id in &event.row_ids {
            match editor.remove_row_by_id(id) {
                Ok(_) => deleted_count += 1,
                Err(e) => {
                    // Already gone; keep going with the rest
                    warn!(
                        "Skipping delete of row {} in '{}/{}': {}",
                        id, event.form_id, event.section, e
                    );
                }
            }
        }

        if deleted_count > 0 {
            info!(
                "Deleted {} row(s) from '{}/{}'.",
                deleted_count, event.form_id, event.section
            );
            modified.insert(event.form_id.clone());
        }
        if deleted_count < event.row_ids.len() {
            feedback_writer.write(FormOperationFeedback {
                message: format!(
                    "Deleted {} of {} row(s) from '{}/{}'; the rest no longer exist.",
                    deleted_count,
                    event.row_ids.len(),
                    event.form_id,
                    event.section
                ),
                is_error: true,
            });
        }
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}
