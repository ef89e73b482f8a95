// src/forms/systems/logic/open_form.rs
use bevy::prelude::*;

use super::{report_failure, report_success};
use crate::forms::{
    events::{FormDataModifiedEvent, FormOperationFeedback, RequestOpenForm},
    resources::FormRegistry,
};

pub fn handle_open_form_request(
    mut events: EventReader<RequestOpenForm>,
    mut registry: ResMut<FormRegistry>,
    mut feedback_writer: EventWriter<FormOperationFeedback>,
    mut data_modified_writer: EventWriter<FormDataModifiedEvent>,
) {
    for event in events.read() {
        match registry.open(&event.form_id) {
            Ok(session) => {
                let title = session.schema().title.clone();
                report_success(
                    &mut feedback_writer,
                    format!("Opened form '{}' ({}).", event.form_id, title),
                );
                data_modified_writer.write(FormDataModifiedEvent {
                    form_id: event.form_id.clone(),
                });
            }
            Err(e) => report_failure(&mut feedback_writer, "Open", &event.form_id, &e),
        }
    }
}
