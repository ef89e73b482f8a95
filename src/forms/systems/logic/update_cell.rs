// src/forms/systems/logic/update_cell.rs
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::{announce_changes, form_not_open, report_failure};
use crate::forms::{
    events::{FormDataModifiedEvent, FormOperationFeedback, RequestFormRevalidation, UpdateCellEvent},
    resources::FormRegistry,
};
use crate::settings::AppSettings;

pub fn handle_cell_update(
    mut events: EventReader<UpdateCellEvent>,
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
                "Cell update",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };

        let result = session.table(&event.section).and_then(|mut editor| {
            let unchanged = editor
                .table()
                .row(event.row_id)
                .and_then(|row| row.get(&event.cell))
                .map_or(false, |current| current == event.new_value);
            if unchanged {
                return Ok(false);
            }
            editor
                .edit_cell_by_id(event.row_id, &event.cell, &event.new_value)
                .map(|_| true)
        });

        match result {
            Ok(true) => {
                trace!(
                    "Updated cell {}.{} of row {} in '{}/{}' to '{}'",
                    event.section,
                    event.cell.key(),
                    event.row_id,
                    event.form_id,
                    event.section,
                    event.new_value
                );
                modified.insert(event.form_id.clone());
            }
            Ok(false) => trace!(
                "Cell value unchanged for '{}/{}' row {}. Skipping update.",
                event.form_id,
                event.section,
                event.row_id
            ),
            Err(e) => report_failure(&mut feedback_writer, "Cell update", &event.form_id, &e),
        }
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}
