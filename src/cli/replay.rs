// src/cli/replay.rs
//! Drives `FormsPlugin` headlessly from a scripted list of edits, one frame
//! per action, the same way an interactive front end would send events.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

use super::{print, read_json, submit, validate, CliError, CliResult};
use crate::forms::events::{
    AddTableRowRequest, FormOperationFeedback, FormSubmitted, RequestAddCustomField,
    RequestAddDynamicColumn, RequestAddSignoffRole, RequestAttachFile, RequestDeleteTableRows,
    RequestOpenForm, RequestRemoveAttachment, RequestRemoveCustomField,
    RequestRemoveDynamicColumn, RequestRemoveSignoffRole, RequestRenameSignoffRole,
    RequestSetSignoffData, RequestSubmitForm, UpdateCellEvent, UpdateFieldEvent,
};
use crate::forms::resources::{ActiveSubmitHandler, FormRegistry};
use crate::forms::state::{AttachmentRef, CellKey, FormState, RowId, SignaturePayload};
use crate::forms::submit::SubmitOutcome;
use crate::forms::validation::ValidationResult;

/// One scripted user action, e.g. `{"action": "editCell", "section": "items",
/// "row": 0, "cell": "qty", "value": "2"}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FormAction {
    SetField {
        path: String,
        value: String,
    },
    AddRow {
        section: String,
    },
    DeleteRows {
        section: String,
        rows: Vec<RowId>,
    },
    AddColumn {
        section: String,
        label: String,
        #[serde(default)]
        key: Option<String>,
    },
    RemoveColumn {
        section: String,
        key: String,
    },
    /// `row` is the row id; `cell` is a column key or `dynamicFields.<key>`.
    EditCell {
        section: String,
        row: RowId,
        cell: String,
        value: String,
    },
    AddSignoffRole {
        role_name: String,
    },
    RenameSignoffRole {
        index: usize,
        name: String,
    },
    RemoveSignoffRole {
        index: usize,
    },
    SetSignoffData {
        index: usize,
        payload: SignaturePayload,
    },
    Attach {
        name: String,
        reference: String,
    },
    RemoveAttachment {
        index: usize,
    },
    AddCustomField {
        label: String,
        value: String,
    },
    RemoveCustomField {
        index: usize,
    },
    Submit,
}

impl FormAction {
    /// Queues the matching request event for `form_id`.
    pub fn send(self, form_id: &str, world: &mut World) -> Result<(), String> {
        let form_id = form_id.to_string();
        match self {
            FormAction::SetField { path, value } => {
                world.send_event(UpdateFieldEvent {
                    form_id,
                    path,
                    new_value: value,
                });
            }
            FormAction::AddRow { section } => {
                world.send_event(AddTableRowRequest { form_id, section });
            }
            FormAction::DeleteRows { section, rows } => {
                world.send_event(RequestDeleteTableRows {
                    form_id,
                    section,
                    row_ids: rows,
                });
            }
            FormAction::AddColumn {
                section,
                label,
                key,
            } => {
                world.send_event(RequestAddDynamicColumn {
                    form_id,
                    section,
                    label,
                    key_override: key,
                });
            }
            FormAction::RemoveColumn { section, key } => {
                world.send_event(RequestRemoveDynamicColumn {
                    form_id,
                    section,
                    key,
                });
            }
            FormAction::EditCell {
                section,
                row,
                cell,
                value,
            } => {
                let cell = CellKey::parse(&cell)
                    .ok_or_else(|| format!("'{}' is not a column key or dynamicFields.<key>", cell))?;
                world.send_event(UpdateCellEvent {
                    form_id,
                    section,
                    row_id: row,
                    cell,
                    new_value: value,
                });
            }
            FormAction::AddSignoffRole { role_name } => {
                world.send_event(RequestAddSignoffRole { form_id, role_name });
            }
            FormAction::RenameSignoffRole { index, name } => {
                world.send_event(RequestRenameSignoffRole {
                    form_id,
                    index,
                    new_name: name,
                });
            }
            FormAction::RemoveSignoffRole { index } => {
                world.send_event(RequestRemoveSignoffRole { form_id, index });
            }
            FormAction::SetSignoffData { index, payload } => {
                world.send_event(RequestSetSignoffData {
                    form_id,
                    index,
                    payload,
                });
            }
            FormAction::Attach { name, reference } => {
                world.send_event(RequestAttachFile {
                    form_id,
                    attachment: AttachmentRef { name, reference },
                });
            }
            FormAction::RemoveAttachment { index } => {
                world.send_event(RequestRemoveAttachment { form_id, index });
            }
            FormAction::AddCustomField { label, value } => {
                world.send_event(RequestAddCustomField {
                    form_id,
                    label,
                    value,
                });
            }
            FormAction::RemoveCustomField { index } => {
                world.send_event(RequestRemoveCustomField { form_id, index });
            }
            FormAction::Submit => {
                world.send_event(RequestSubmitForm { form_id });
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct ReplayReport {
    pub feedback: Vec<FormOperationFeedback>,
    pub submissions: Vec<SubmitOutcome>,
    pub state: FormState,
    pub validation: ValidationResult,
}

fn drain_events<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

/// Opens `form_id` in `app` (which must have `FormsPlugin`) and applies the
/// actions in order, one update per action.
pub fn replay(app: &mut App, form_id: &str, actions: Vec<FormAction>) -> CliResult<ReplayReport> {
    let mut feedback = Vec::new();
    let mut submissions = Vec::new();

    app.world_mut().send_event(RequestOpenForm {
        form_id: form_id.to_string(),
    });
    app.update();
    feedback.extend(drain_events::<FormOperationFeedback>(app));

    if app
        .world()
        .resource::<FormRegistry>()
        .session(form_id)
        .is_none()
    {
        return Err(CliError::UnknownForm(form_id.to_string()));
    }

    for (index, action) in actions.into_iter().enumerate() {
        trace!("Replay: action {} {:?}", index, action);
        action
            .send(form_id, app.world_mut())
            .map_err(|reason| CliError::InvalidAction { index, reason })?;
        app.update();
        feedback.extend(drain_events::<FormOperationFeedback>(app));
        submissions.extend(
            drain_events::<FormSubmitted>(app)
                .into_iter()
                .map(|e| e.outcome),
        );
    }

    let mut registry = app.world_mut().resource_mut::<FormRegistry>();
    let session = registry
        .session_mut(form_id)
        .ok_or_else(|| CliError::UnknownForm(form_id.to_string()))?;
    let validation = session.validate().clone();
    Ok(ReplayReport {
        feedback,
        submissions,
        state: session.state().clone(),
        validation,
    })
}

/// Prints the feedback, any submissions and the final state. With
/// `print_mode` the state is rendered read-only instead of as JSON.
pub fn run(
    mut app: App,
    form_id: &str,
    actions_path: &Path,
    export_dir: Option<&Path>,
    print_mode: bool,
) -> CliResult<bool> {
    let actions: Vec<FormAction> = read_json(actions_path)?;
    app.insert_resource(ActiveSubmitHandler(submit::handler_for(export_dir)));

    let report = replay(&mut app, form_id, actions)?;
    for message in &report.feedback {
        let marker = if message.is_error { "!" } else { "-" };
        println!("{} {}", marker, message.message);
    }
    for outcome in &report.submissions {
        print!("{}", submit::describe(outcome));
    }
    if print_mode {
        let registry = app.world().resource::<FormRegistry>();
        if let Some(schema) = registry.schema(form_id) {
            print!("{}", print::render(schema, &report.state));
        }
    } else {
        let json = serde_json::to_string_pretty(&report.state).map_err(|source| CliError::Json {
            path: actions_path.to_path_buf(),
            source,
        })?;
        println!("{}", json);
    }
    print!("{}", validate::render(&report.validation));
    Ok(report.validation.valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::plugin::FormsPlugin;

    #[test]
    fn actions_deserialize_from_camel_case() {
        let actions: Vec<FormAction> = serde_json::from_str(
            r#"[
                {"action": "setField", "path": "customer", "value": "Acme"},
                {"action": "addColumn", "section": "items", "label": "Cost Center"},
                {"action": "editCell", "section": "items", "row": 0, "cell": "dynamicFields.CostCenter", "value": "CC-1"},
                {"action": "addSignoffRole", "roleName": "Auditor"},
                {"action": "submit"}
            ]"#,
        )
        .unwrap();
        assert_eq!(actions.len(), 5);
        assert_eq!(
            actions[1],
            FormAction::AddColumn {
                section: "items".into(),
                label: "Cost Center".into(),
                key: None
            }
        );
        assert_eq!(
            actions[3],
            FormAction::AddSignoffRole {
                role_name: "Auditor".into()
            }
        );
        assert_eq!(actions[4], FormAction::Submit);
    }

    #[test]
    fn replays_edits_through_the_plugin() {
        let mut app = App::new();
        app.add_plugins(FormsPlugin);
        let actions = vec![
            FormAction::EditCell {
                section: "lines".into(),
                row: RowId(0),
                cell: "base".into(),
                value: "200".into(),
            },
            FormAction::EditCell {
                section: "lines".into(),
                row: RowId(0),
                cell: "high".into(),
                value: "250".into(),
            },
        ];
        let report = replay(&mut app, "budgetVariance", actions).unwrap();
        assert_eq!(report.state.get("lines[0].variancePercent"), "25.00");
        assert!(!report.validation.valid);
        assert!(report.validation.errors.contains_key("department"));
    }

    #[test]
    fn unknown_form_is_reported() {
        let mut app = App::new();
        app.add_plugins(FormsPlugin);
        let err = replay(&mut app, "nope", Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::UnknownForm(_)));
    }

    #[test]
    fn bad_cell_locator_stops_the_replay() {
        let mut app = App::new();
        app.add_plugins(FormsPlugin);
        let actions = vec![FormAction::EditCell {
            section: "items".into(),
            row: RowId(0),
            cell: "a.b".into(),
            value: "x".into(),
        }];
        let err = replay(&mut app, "invoice", actions).unwrap_err();
        assert!(matches!(err, CliError::InvalidAction { index: 0, .. }));
    }
}
