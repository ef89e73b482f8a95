// src/forms/plugin.rs
use bevy::prelude::*;

use super::events::{
    AddTableRowRequest, FormDataModifiedEvent, FormOperationFeedback, FormSubmitted,
    RequestAddCustomField, RequestAddDynamicColumn, RequestAddSignoffRole, RequestAttachFile,
    RequestDeleteTableRows, RequestFormRevalidation, RequestOpenForm, RequestRemoveAttachment,
    RequestRemoveCustomField, RequestRemoveDynamicColumn, RequestRemoveSignoffRole,
    RequestRenameSignoffRole, RequestSetSignoffData, RequestSubmitForm, UpdateCellEvent,
    UpdateFieldEvent,
};
use super::resources::{ActiveSubmitHandler, FormRegistry};
use super::systems;
use crate::settings::AppSettings;

/// Ordering of the form systems within a frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FormSystemSet {
    /// Opening forms.
    UserInput,
    /// Edits to open sessions.
    ApplyChanges,
    Validation,
    Submission,
}

/// Registers the form catalog, the request/feedback events and their handlers.
///
/// Resources already present when the plugin is added (settings loaded from
/// disk, a custom submit handler) are left in place.
pub struct FormsPlugin;

impl Plugin for FormsPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                FormSystemSet::UserInput,
                FormSystemSet::ApplyChanges.after(FormSystemSet::UserInput),
                FormSystemSet::Validation.after(FormSystemSet::ApplyChanges),
                FormSystemSet::Submission.after(FormSystemSet::Validation),
            ),
        );

        // --- Resource Initialization ---
        app.init_resource::<FormRegistry>()
            .init_resource::<AppSettings>()
            .init_resource::<ActiveSubmitHandler>();

        // --- Event Registration ---
        app.add_event::<RequestOpenForm>()
            .add_event::<UpdateFieldEvent>()
            .add_event::<AddTableRowRequest>()
            .add_event::<RequestDeleteTableRows>()
            .add_event::<RequestAddDynamicColumn>()
            .add_event::<RequestRemoveDynamicColumn>()
            .add_event::<UpdateCellEvent>()
            .add_event::<RequestAddSignoffRole>()
            .add_event::<RequestRenameSignoffRole>()
            .add_event::<RequestRemoveSignoffRole>()
            .add_event::<RequestSetSignoffData>()
            .add_event::<RequestAttachFile>()
            .add_event::<RequestRemoveAttachment>()
            .add_event::<RequestAddCustomField>()
            .add_event::<RequestRemoveCustomField>()
            .add_event::<RequestSubmitForm>()
            .add_event::<RequestFormRevalidation>()
            .add_event::<FormDataModifiedEvent>()
            .add_event::<FormOperationFeedback>()
            .add_event::<FormSubmitted>();

        // --- Startup Systems ---
        app.add_systems(
            Startup,
            (
                // 1. Built-in definitions
                systems::io::register_builtin_forms,
                // 2. User schemas override built-ins with the same id
                systems::io::scan_forms_directory,
            )
                .chain(),
        );

        // --- Update Systems ---
        app.add_systems(
            Update,
            systems::logic::handle_open_form_request.in_set(FormSystemSet::UserInput),
        );
        app.add_systems(
            Update,
            (
                // Structure changes before value edits so a column added this
                // frame can be filled in the same frame.
                systems::logic::handle_add_row_request,
                systems::logic::handle_add_column_request,
                systems::logic::handle_update_field,
                systems::logic::handle_cell_update,
                systems::logic::handle_remove_column_request,
                systems::logic::handle_delete_rows_request,
                systems::logic::handle_add_signoff_role,
                systems::logic::handle_rename_signoff_role,
                systems::logic::handle_set_signoff_data,
                systems::logic::handle_remove_signoff_role,
                systems::logic::handle_attach_file,
                systems::logic::handle_remove_attachment,
                systems::logic::handle_add_custom_field,
                systems::logic::handle_remove_custom_field,
            )
                .chain()
                .in_set(FormSystemSet::ApplyChanges),
        );
        app.add_systems(
            Update,
            systems::logic::handle_revalidation_request.in_set(FormSystemSet::Validation),
        );
        app.add_systems(
            Update,
            systems::logic::handle_submit_request.in_set(FormSystemSet::Submission),
        );

        info!("FormsPlugin initialized.");
    }
}
