// tests/form_flow.rs
// End-to-end flows through FormsPlugin: requests in, feedback and state out.

use bevy::prelude::*;
use std::sync::{Arc, Mutex};

use formdesk::forms::definitions::{FieldDataType, FieldDefinition, FormSchema, SectionDefinition};
use formdesk::forms::events::{
    AddTableRowRequest, FormDataModifiedEvent, FormOperationFeedback, FormSubmitted,
    RequestAddDynamicColumn, RequestAddSignoffRole, RequestDeleteTableRows, RequestOpenForm,
    RequestRemoveDynamicColumn, RequestRemoveSignoffRole, RequestRenameSignoffRole,
    RequestSetSignoffData, RequestSubmitForm, UpdateCellEvent, UpdateFieldEvent,
};
use formdesk::forms::state::{CellKey, FormState, RowId};
use formdesk::forms::submit::{SubmissionReceipt, SubmitError, SubmitHandler, SubmitOutcome};
use formdesk::forms::{ActiveSubmitHandler, FormRegistry, FormSession, FormsPlugin};
use formdesk::AppSettings;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<FormState>>>);

impl SubmitHandler for Capture {
    fn submit(&self, form: &FormSchema, state: &FormState) -> Result<SubmissionReceipt, SubmitError> {
        self.0.lock().unwrap().push(state.clone());
        Ok(SubmissionReceipt::new(&form.form_id))
    }
}

fn app_with(settings: Option<AppSettings>) -> App {
    let mut app = App::new();
    if let Some(settings) = settings {
        app.insert_resource(settings);
    }
    app.add_plugins(FormsPlugin);
    app.update();
    app
}

fn open(app: &mut App, form_id: &str) {
    app.world_mut().send_event(RequestOpenForm {
        form_id: form_id.to_string(),
    });
    app.update();
    drain::<FormOperationFeedback>(app);
}

fn drain<E: Event>(app: &mut App) -> Vec<E> {
    app.world_mut().resource_mut::<Events<E>>().drain().collect()
}

fn session<'a>(app: &'a App, form_id: &str) -> &'a FormSession {
    app.world()
        .resource::<FormRegistry>()
        .session(form_id)
        .expect("form should be open")
}

fn send<E: Event>(app: &mut App, event: E) {
    app.world_mut().send_event(event);
}

fn edit_cell(app: &mut App, form_id: &str, section: &str, row: u64, cell: &str, value: &str) {
    send(
        app,
        UpdateCellEvent {
            form_id: form_id.to_string(),
            section: section.to_string(),
            row_id: RowId(row),
            cell: CellKey::parse(cell).unwrap(),
            new_value: value.to_string(),
        },
    );
}

fn simple_schema() -> FormSchema {
    FormSchema::new("simple", "Simple")
        .with_field(FieldDefinition::new("name", "Name", FieldDataType::Text).required())
        .with_field(FieldDefinition::new("amount", "Amount", FieldDataType::Number).required())
        .with_section(
            SectionDefinition::new(
                "items",
                "Items",
                vec![FieldDefinition::new("description", "Description", FieldDataType::Text)],
            )
            .with_min_items(1),
        )
}

#[test]
fn happy_path_hands_exact_state_to_submit_handler() {
    let mut app = app_with(None);
    let capture = Capture::default();
    app.insert_resource(ActiveSubmitHandler(Box::new(capture.clone())));
    app.world_mut()
        .resource_mut::<FormRegistry>()
        .register(simple_schema())
        .unwrap();
    open(&mut app, "simple");

    for (path, value) in [("name", "Acme"), ("amount", "100")] {
        send(
            &mut app,
            UpdateFieldEvent {
                form_id: "simple".into(),
                path: path.into(),
                new_value: value.into(),
            },
        );
    }
    app.update();
    send(&mut app, RequestSubmitForm { form_id: "simple".into() });
    app.update();

    let submitted = drain::<FormSubmitted>(&mut app);
    assert_eq!(submitted.len(), 1);
    assert!(submitted[0].outcome.is_accepted());

    let mut expected = FormState::from_schema(&simple_schema());
    expected.set("name", "Acme");
    expected.set("amount", "100");
    let received = capture.0.lock().unwrap();
    assert_eq!(received.as_slice(), &[expected]);
    assert!(received[0].attachments.is_empty());
    assert!(received[0].custom_fields.is_empty());
    let json = serde_json::to_value(&received[0]).unwrap();
    assert_eq!(json["attachments"], serde_json::json!([]));
    assert_eq!(json["customFields"], serde_json::json!([]));
}

#[test]
fn invalid_form_is_not_submitted_and_each_attempt_revalidates() {
    let mut app = app_with(None);
    let capture = Capture::default();
    app.insert_resource(ActiveSubmitHandler(Box::new(capture.clone())));
    open(&mut app, "invoice");

    send(&mut app, RequestSubmitForm { form_id: "invoice".into() });
    app.update();
    let first = drain::<FormSubmitted>(&mut app);
    match &first[0].outcome {
        SubmitOutcome::Rejected(result) => assert!(result.errors.contains_key("customer")),
        other => panic!("expected rejection, got {:?}", other),
    }
    let feedback = drain::<FormOperationFeedback>(&mut app);
    assert!(feedback.iter().any(|f| f.is_error));

    send(
        &mut app,
        UpdateFieldEvent {
            form_id: "invoice".into(),
            path: "customer".into(),
            new_value: "Acme".into(),
        },
    );
    app.update();
    send(&mut app, RequestSubmitForm { form_id: "invoice".into() });
    app.update();
    match &drain::<FormSubmitted>(&mut app)[0].outcome {
        SubmitOutcome::Rejected(result) => {
            assert!(!result.errors.contains_key("customer"));
            assert!(result.errors.contains_key("invoiceNumber"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(capture.0.lock().unwrap().is_empty());
}

#[test]
fn duplicate_column_is_reported_and_leaves_table_unchanged() {
    let mut app = app_with(None);
    open(&mut app, "assetReceipt");

    for label in ["Cost Center", "Cost  Center"] {
        send(
            &mut app,
            RequestAddDynamicColumn {
                form_id: "assetReceipt".into(),
                section: "items".into(),
                label: label.into(),
                key_override: None,
            },
        );
    }
    app.update();

    let feedback = drain::<FormOperationFeedback>(&mut app);
    assert_eq!(feedback.len(), 2);
    assert!(!feedback[0].is_error);
    assert!(feedback[1].is_error);

    let table = session(&app, "assetReceipt").state().table("items").unwrap();
    assert_eq!(table.columns.len(), 1);
    assert_eq!(table.columns[0].key, "CostCenter");
    assert_eq!(table.rows[0].dynamic_fields.get("CostCenter").map(String::as_str), Some(""));
}

#[test]
fn column_added_and_filled_in_the_same_frame_then_removed() {
    let mut app = app_with(None);
    open(&mut app, "assetReceipt");

    send(
        &mut app,
        RequestAddDynamicColumn {
            form_id: "assetReceipt".into(),
            section: "items".into(),
            label: "Serial No".into(),
            key_override: Some("serial".into()),
        },
    );
    edit_cell(&mut app, "assetReceipt", "items", 0, "dynamicFields.serial", "SN-1");
    app.update();
    assert_eq!(
        session(&app, "assetReceipt").state().get("items[0].dynamicFields.serial"),
        "SN-1"
    );

    send(
        &mut app,
        RequestRemoveDynamicColumn {
            form_id: "assetReceipt".into(),
            section: "items".into(),
            key: "serial".into(),
        },
    );
    app.update();
    let table = session(&app, "assetReceipt").state().table("items").unwrap();
    assert!(table.columns.is_empty());
    assert!(table.rows[0].dynamic_fields.is_empty());
}

#[test]
fn row_ids_stay_valid_after_earlier_rows_are_deleted() {
    let mut app = app_with(None);
    open(&mut app, "assetReceipt");

    for _ in 0..2 {
        send(
            &mut app,
            AddTableRowRequest {
                form_id: "assetReceipt".into(),
                section: "items".into(),
            },
        );
    }
    app.update();
    edit_cell(&mut app, "assetReceipt", "items", 2, "description", "Laptop");
    app.update();

    send(
        &mut app,
        RequestDeleteTableRows {
            form_id: "assetReceipt".into(),
            section: "items".into(),
            row_ids: vec![RowId(1)],
        },
    );
    edit_cell(&mut app, "assetReceipt", "items", 2, "assetTag", "A-77");
    app.update();

    let state = session(&app, "assetReceipt").state();
    assert_eq!(state.section_len("items"), 2);
    assert_eq!(state.get("items[1].description"), "Laptop");
    assert_eq!(state.get("items[1].assetTag"), "A-77");
}

#[test]
fn deleting_a_row_twice_reports_the_stale_id() {
    let mut app = app_with(None);
    open(&mut app, "invoice");

    for _ in 0..2 {
        send(
            &mut app,
            RequestDeleteTableRows {
                form_id: "invoice".into(),
                section: "items".into(),
                row_ids: vec![RowId(0)],
            },
        );
        app.update();
    }
    let feedback = drain::<FormOperationFeedback>(&mut app);
    assert!(feedback.iter().any(|f| f.is_error));
    assert_eq!(session(&app, "invoice").state().section_len("items"), 0);
}

#[test]
fn min_items_error_clears_when_a_row_is_added() {
    let mut app = app_with(None);
    open(&mut app, "invoice");

    send(
        &mut app,
        RequestDeleteTableRows {
            form_id: "invoice".into(),
            section: "items".into(),
            row_ids: vec![RowId(0)],
        },
    );
    app.update();
    let errors = &session(&app, "invoice").last_validation().unwrap().errors;
    assert!(errors.contains_key("items"));
    assert!(errors.contains_key("customer"));

    send(
        &mut app,
        AddTableRowRequest {
            form_id: "invoice".into(),
            section: "items".into(),
        },
    );
    app.update();
    let errors = &session(&app, "invoice").last_validation().unwrap().errors;
    assert!(!errors.contains_key("items"));
    assert!(errors.contains_key("customer"));
}

#[test]
fn revalidation_can_be_deferred_until_submit() {
    let settings = AppSettings {
        revalidate_on_change: false,
        ..Default::default()
    };
    let mut app = app_with(Some(settings));
    open(&mut app, "invoice");

    send(
        &mut app,
        UpdateFieldEvent {
            form_id: "invoice".into(),
            path: "customer".into(),
            new_value: "Acme".into(),
        },
    );
    app.update();
    assert!(session(&app, "invoice").last_validation().is_none());

    send(&mut app, RequestSubmitForm { form_id: "invoice".into() });
    app.update();
    assert!(session(&app, "invoice").last_validation().is_some());
}

#[test]
fn cash_flow_rows_recompute_from_scratch() {
    let mut app = app_with(None);
    open(&mut app, "cashFlowStatement");

    edit_cell(&mut app, "cashFlowStatement", "accounts", 0, "openingBalance", "100");
    edit_cell(&mut app, "cashFlowStatement", "accounts", 0, "cashInflows", "50");
    edit_cell(&mut app, "cashFlowStatement", "accounts", 0, "cashOutflows", "30");
    app.update();
    let state = session(&app, "cashFlowStatement").state();
    assert_eq!(state.get("accounts[0].netMovement"), "20.00");
    assert_eq!(state.get("accounts[0].closingBalance"), "120.00");

    edit_cell(&mut app, "cashFlowStatement", "accounts", 0, "cashInflows", "80");
    app.update();
    let state = session(&app, "cashFlowStatement").state();
    assert_eq!(state.get("accounts[0].netMovement"), "50.00");
    assert_eq!(state.get("accounts[0].closingBalance"), "150.00");
}

#[test]
fn variance_handles_zero_base() {
    let mut app = app_with(None);
    open(&mut app, "budgetVariance");

    edit_cell(&mut app, "budgetVariance", "lines", 0, "base", "0");
    edit_cell(&mut app, "budgetVariance", "lines", 0, "high", "10");
    app.update();
    assert_eq!(
        session(&app, "budgetVariance").state().get("lines[0].variancePercent"),
        "0.00"
    );
}

#[test]
fn signoff_roles_are_editable_and_stale_indices_are_reported() {
    let mut app = app_with(None);
    open(&mut app, "assetReceipt");

    send(
        &mut app,
        RequestAddSignoffRole {
            form_id: "assetReceipt".into(),
            role_name: "Auditor".into(),
        },
    );
    send(
        &mut app,
        RequestSetSignoffData {
            form_id: "assetReceipt".into(),
            index: 3,
            payload: serde_json::json!({"signedBy": "kim"}),
        },
    );
    send(
        &mut app,
        RequestRenameSignoffRole {
            form_id: "assetReceipt".into(),
            index: 3,
            new_name: "External Auditor".into(),
        },
    );
    app.update();
    drain::<FormOperationFeedback>(&mut app);

    send(
        &mut app,
        RequestRemoveSignoffRole {
            form_id: "assetReceipt".into(),
            index: 9,
        },
    );
    send(
        &mut app,
        RequestRemoveSignoffRole {
            form_id: "assetReceipt".into(),
            index: 0,
        },
    );
    app.update();
    let feedback = drain::<FormOperationFeedback>(&mut app);
    assert_eq!(feedback.iter().filter(|f| f.is_error).count(), 1);

    let roles = &session(&app, "assetReceipt").state().signoffs.roles;
    let names: Vec<&str> = roles.iter().map(|r| r.role_name.as_str()).collect();
    assert_eq!(names, ["Checked By", "Approved By", "External Auditor"]);
    assert_eq!(roles[2].data, serde_json::json!({"signedBy": "kim"}));
}

#[test]
fn empty_writes_to_unresolvable_paths_are_reported() {
    let mut app = app_with(None);
    open(&mut app, "invoice");
    drain::<FormDataModifiedEvent>(&mut app);

    for path in ["items[9].description", "customer[0].x", "items[0]..qty"] {
        send(
            &mut app,
            UpdateFieldEvent {
                form_id: "invoice".into(),
                path: path.into(),
                new_value: String::new(),
            },
        );
    }
    send(
        &mut app,
        UpdateFieldEvent {
            form_id: "invoice".into(),
            path: "customer".into(),
            new_value: String::new(),
        },
    );
    app.update();

    let feedback = drain::<FormOperationFeedback>(&mut app);
    assert_eq!(feedback.len(), 3, "{:?}", feedback);
    assert!(feedback.iter().all(|f| f.is_error));
    assert!(feedback[0].message.contains("out of bounds"));
    assert!(drain::<FormDataModifiedEvent>(&mut app).is_empty());
}

#[test]
fn edits_to_a_form_that_is_not_open_are_reported() {
    let mut app = app_with(None);
    send(
        &mut app,
        UpdateFieldEvent {
            form_id: "invoice".into(),
            path: "customer".into(),
            new_value: "Acme".into(),
        },
    );
    app.update();
    let feedback = drain::<FormOperationFeedback>(&mut app);
    assert_eq!(feedback.len(), 1);
    assert!(feedback[0].is_error);
}

#[test]
fn forms_directory_adds_and_overrides_schemas() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("travel.json"),
        r#"{
            "formId": "travelRequest",
            "title": "Travel Request",
            "category": "HR",
            "fields": [{"key": "destination", "label": "Destination", "rules": ["required"]}]
        }"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("invoice.json"),
        r#"{"formId": "invoice", "title": "Custom Invoice"}"#,
    )
    .unwrap();

    let app = app_with(Some(AppSettings {
        forms_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    }));
    let registry = app.world().resource::<FormRegistry>();
    assert_eq!(
        registry.schema("travelRequest").map(|s| s.title.as_str()),
        Some("Travel Request")
    );
    assert_eq!(
        registry.schema("invoice").map(|s| s.title.as_str()),
        Some("Custom Invoice")
    );
    assert!(registry.schema("cashFlowStatement").is_some());
}
