// src/forms/systems/logic/submit_form.rs
use bevy::prelude::*;

use super::{form_not_open, report_failure};
use crate::forms::{
    events::{FormOperationFeedback, FormSubmitted, RequestSubmitForm},
    resources::{ActiveSubmitHandler, FormRegistry},
    submit::SubmitOutcome,
};

/// Validates the form and, only when it passes, hands it to the active submit
/// handler. Every attempt ends in exactly one `FormSubmitted` event.
pub fn handle_submit_request(
    mut events: EventReader<RequestSubmitForm>,
    mut registry: ResMut<FormRegistry>,
    handler: Res<ActiveSubmitHandler>,
    mut feedback_writer: EventWriter<FormOperationFeedback>,
    mut submitted_writer: EventWriter<FormSubmitted>,
) {
    for event in events.read() {
        let Some(session) = registry.session_mut(&event.form_id) else {
            report_failure(
                &mut feedback_writer,
                "Submit",
                &event.form_id,
                &form_not_open(&event.form_id),
            );
            continue;
        };

        let outcome = session.submit(handler.0.as_ref());
        let (message, is_error) = match &outcome {
            SubmitOutcome::Accepted(receipt) => (
                format!(
                    "Submitted '{}' (submission {}).",
                    event.form_id, receipt.submission_id
                ),
                false,
            ),
            SubmitOutcome::Rejected(result) => (
                format!(
                    "'{}' was not submitted: {}",
                    event.form_id,
                    result.summary()
                ),
                true,
            ),
            SubmitOutcome::Failed(reason) => (
                format!("Submitting '{}' failed: {}", event.form_id, reason),
                true,
            ),
        };
        if is_error {
            warn!("{}", message);
        } else {
            info!("{}", message);
        }
        feedback_writer.write(FormOperationFeedback { message, is_error });
        submitted_writer.write(FormSubmitted {
            form_id: event.form_id.clone(),
            outcome,
        });
    }
}
