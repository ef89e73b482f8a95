// src/forms/systems/logic/mod.rs

pub mod add_column;
pub mod add_row;
pub mod appendix_handlers;
pub mod delete_column;
pub mod delete_rows;
pub mod open_form;
pub mod revalidate;
pub mod signoff_handlers;
pub mod submit_form;
pub mod update_cell;
pub mod update_field;

pub use add_column::handle_add_column_request;
pub use add_row::handle_add_row_request;
pub use appendix_handlers::{
    handle_add_custom_field, handle_attach_file, handle_remove_attachment,
    handle_remove_custom_field,
};
pub use delete_column::handle_remove_column_request;
pub use delete_rows::handle_delete_rows_request;
pub use open_form::handle_open_form_request;
pub use revalidate::handle_revalidation_request;
pub use signoff_handlers::{
    handle_add_signoff_role, handle_remove_signoff_role, handle_rename_signoff_role,
    handle_set_signoff_data,
};
pub use submit_form::handle_submit_request;
pub use update_cell::handle_cell_update;
pub use update_field::handle_update_field;

use bevy::prelude::*;
use std::collections::BTreeSet;

use crate::forms::error::FormError;
use crate::forms::events::{FormDataModifiedEvent, FormOperationFeedback, RequestFormRevalidation};
use crate::settings::AppSettings;

/// Sends one modified event per touched form and, when the settings ask for
/// it, a revalidation request.
pub(crate) fn announce_changes(
    modified: BTreeSet<String>,
    settings: Option<&AppSettings>,
    data_modified_writer: &mut EventWriter<FormDataModifiedEvent>,
    revalidate_writer: &mut EventWriter<RequestFormRevalidation>,
) {
    let revalidate = settings.map_or(true, |s| s.revalidate_on_change);
    for form_id in modified {
        if revalidate {
            trace!("Sent revalidation request for form '{}'.", form_id);
            revalidate_writer.write(RequestFormRevalidation {
                form_id: form_id.clone(),
            });
        }
        data_modified_writer.write(FormDataModifiedEvent { form_id });
    }
}

/// Logs and reports a failed request. Definition mistakes are logged as errors,
/// user-recoverable ones as warnings.
pub(crate) fn report_failure(
    feedback_writer: &mut EventWriter<FormOperationFeedback>,
    action: &str,
    form_id: &str,
    err: &FormError,
) {
    let message = format!("{} failed for '{}': {}", action, form_id, err);
    if err.is_programmer_error() {
        error!("{}", message);
    } else {
        warn!("{}", message);
    }
    feedback_writer.write(FormOperationFeedback {
        message,
        is_error: true,
    });
}

pub(crate) fn report_success(feedback_writer: &mut EventWriter<FormOperationFeedback>, message: String) {
    info!("{}", message);
    feedback_writer.write(FormOperationFeedback {
        message,
        is_error: false,
    });
}

pub(crate) fn form_not_open(form_id: &str) -> FormError {
    FormError::FormNotFound(form_id.to_string())
}
