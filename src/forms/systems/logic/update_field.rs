// src/forms/systems/logic/update_field.rs
use bevy::prelude::*;
use std::collections::BTreeSet;

use super::{announce_changes, form_not_open, report_failure};
use crate::forms::{
    error::{FormError, FormResult},
    events::{FormDataModifiedEvent, FormOperationFeedback, RequestFormRevalidation, UpdateFieldEvent},
    resources::{FormRegistry, FormSession},
    state::{FieldPath, RowSelector},
};
use crate::settings::AppSettings;

pub fn handle_update_field(
    mut events: EventReader<UpdateFieldEvent>,
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
                "Field update",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };

        let path = match FieldPath::parse(&event.path) {
            Ok(path) => path,
            Err(e) => {
                report_failure(&mut feedback_writer, "Field update", &event.form_id, &e);
                continue;
            }
        };

        // Unresolvable paths fall through so the write reports why.
        if session.state().get_path(&path).as_deref() == Some(event.new_value.as_str()) {
            trace!(
                "Value unchanged for '{}' {}. Skipping update.",
                event.form_id,
                event.path
            );
            continue;
        }

        match apply_field_update(session, &path, &event.new_value) {
            Ok(()) => {
                trace!(
                    "Updated '{}' {} to '{}'",
                    event.form_id,
                    event.path,
                    event.new_value
                );
                modified.insert(event.form_id.clone());
            }
            Err(e) => report_failure(&mut feedback_writer, "Field update", &event.form_id, &e),
        }
    }

    announce_changes(
        modified,
        settings.as_deref(),
        &mut data_modified_writer,
        &mut revalidate_writer,
    );
}

/// Cells of declared sections go through the table editor so derived cells
/// follow; everything else is a plain path write.
fn apply_field_update(session: &mut FormSession, path: &FieldPath, value: &str) -> FormResult<()> {
    if let FieldPath::Cell {
        section,
        row: RowSelector::Index(index),
        cell,
    } = path
    {
        if session.schema().section(section).is_some() {
            let mut editor = session.table(section)?;
            let len = editor.table().len();
            let id = editor
                .table()
                .row_id_at(*index)
                .ok_or_else(|| FormError::IndexOutOfBounds {
                    target: section.clone(),
                    index: *index,
                    len,
                })?;
            return editor.edit_cell_by_id(id, cell, value);
        }
    }
    session.state_mut().set_path(path, value.to_string())
}
