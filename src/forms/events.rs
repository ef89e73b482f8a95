// src/forms/events.rs
use bevy::prelude::Event;

use super::state::{AttachmentRef, CellKey, RowId, SignaturePayload};
use super::submit::SubmitOutcome;

/// Mounts a fresh instance of a form, discarding any open one with the same id.
#[derive(Event, Debug, Clone)]
pub struct RequestOpenForm {
    pub form_id: String,
}

/// Sets one value addressed by a path such as `vendor` or `items[0].remarks`.
#[derive(Event, Debug, Clone)]
pub struct UpdateFieldEvent {
    pub form_id: String,
    pub path: String,
    pub new_value: String,
}

#[derive(Event, Debug, Clone)]
pub struct AddTableRowRequest {
    pub form_id: String,
    pub section: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestDeleteTableRows {
    pub form_id: String,
    pub section: String,
    pub row_ids: Vec<RowId>,
}

/// Label typed by the user plus an optional explicit key.
#[derive(Event, Debug, Clone)]
pub struct RequestAddDynamicColumn {
    pub form_id: String,
    pub section: String,
    pub label: String,
    pub key_override: Option<String>,
}

#[derive(Event, Debug, Clone)]
pub struct RequestRemoveDynamicColumn {
    pub form_id: String,
    pub section: String,
    pub key: String,
}

#[derive(Event, Debug, Clone)]
pub struct UpdateCellEvent {
    pub form_id: String,
    pub section: String,
    pub row_id: RowId,
    pub cell: CellKey,
    pub new_value: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestAddSignoffRole {
    pub form_id: String,
    pub role_name: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestRenameSignoffRole {
    pub form_id: String,
    pub index: usize,
    pub new_name: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestRemoveSignoffRole {
    pub form_id: String,
    pub index: usize,
}

#[derive(Event, Debug, Clone)]
pub struct RequestSetSignoffData {
    pub form_id: String,
    pub index: usize,
    pub payload: SignaturePayload,
}

#[derive(Event, Debug, Clone)]
pub struct RequestAddCustomField {
    pub form_id: String,
    pub label: String,
    pub value: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestRemoveCustomField {
    pub form_id: String,
    pub index: usize,
}

#[derive(Event, Debug, Clone)]
pub struct RequestAttachFile {
    pub form_id: String,
    pub attachment: AttachmentRef,
}

#[derive(Event, Debug, Clone)]
pub struct RequestRemoveAttachment {
    pub form_id: String,
    pub index: usize,
}

#[derive(Event, Debug, Clone)]
pub struct RequestSubmitForm {
    pub form_id: String,
}

#[derive(Event, Debug, Clone)]
pub struct RequestFormRevalidation {
    pub form_id: String,
}

/// Sent after any change to a session's state.
#[derive(Event, Debug, Clone)]
pub struct FormDataModifiedEvent {
    pub form_id: String,
}

/// User-facing message about the outcome of a request.
#[derive(Event, Debug, Clone)]
pub struct FormOperationFeedback {
    pub message: String,
    pub is_error: bool,
}

#[derive(Event, Debug, Clone)]
pub struct FormSubmitted {
    pub form_id: String,
    pub outcome: SubmitOutcome,
}
