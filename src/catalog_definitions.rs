// src/catalog_definitions.rs
//! Forms that ship with the binary. Files in the configured forms directory
//! are loaded after these and replace any form with the same id.

use crate::forms::definitions::{
    Derivation, FieldDataType, FieldDefinition, FormSchema, Formula, SectionDefinition,
};

pub const ASSET_RECEIPT_ID: &str = "assetReceipt";
pub const CASH_FLOW_ID: &str = "cashFlowStatement";
pub const BUDGET_VARIANCE_ID: &str = "budgetVariance";
pub const INVOICE_ID: &str = "invoice";

pub fn builtin_forms() -> Vec<FormSchema> {
    vec![
        asset_receipt(),
        cash_flow_statement(),
        budget_variance(),
        invoice(),
    ]
}

fn text(key: &str, label: &str) -> FieldDefinition {
    FieldDefinition::new(key, label, FieldDataType::Text)
}

fn number(key: &str, label: &str) -> FieldDefinition {
    FieldDefinition::new(key, label, FieldDataType::Number)
}

fn date(key: &str, label: &str) -> FieldDefinition {
    FieldDefinition::new(key, label, FieldDataType::Date)
}

pub fn asset_receipt() -> FormSchema {
    let items = SectionDefinition::new(
        "items",
        "Received Items",
        vec![
            text("assetTag", "Asset Tag").required(),
            text("description", "Description").required(),
            number("quantity", "Quantity").required().with_default("1"),
            number("unitCost", "Unit Cost"),
            number("amount", "Amount").read_only().totaled(),
        ],
    )
    .with_derivation(Derivation::new(
        "amount",
        Formula::Product {
            factors: vec!["quantity".to_string(), "unitCost".to_string()],
        },
    ))
    .with_min_items(1);

    FormSchema::new(ASSET_RECEIPT_ID, "Asset Receipt")
        .with_category("Assets")
        .with_field(date("receiptDate", "Receipt Date").required())
        .with_field(text("vendor", "Vendor").required())
        .with_field(text("poNumber", "PO Number"))
        .with_field(text("receivedAt", "Receiving Location"))
        .with_section(items)
        .with_signoff_roles(&["Received By", "Checked By", "Approved By"])
}

pub fn cash_flow_statement() -> FormSchema {
    let lines = SectionDefinition::new(
        "accounts",
        "Accounts",
        vec![
            text("account", "Account").required(),
            number("openingBalance", "Opening Balance").required(),
            number("cashInflows", "Cash Inflows").totaled(),
            number("cashOutflows", "Cash Outflows").totaled(),
            number("netMovement", "Net Movement").read_only().totaled(),
            number("closingBalance", "Closing Balance").read_only(),
        ],
    )
    .with_derivation(Derivation::new(
        "netMovement",
        Formula::Difference {
            minuend: "cashInflows".to_string(),
            subtrahend: "cashOutflows".to_string(),
        },
    ))
    // Runs after netMovement so it sees the fresh value
    .with_derivation(Derivation::new(
        "closingBalance",
        Formula::Sum {
            terms: vec!["openingBalance".to_string(), "netMovement".to_string()],
        },
    ))
    .with_min_items(1);

    FormSchema::new(CASH_FLOW_ID, "Cash Flow Statement")
        .with_category("Treasury")
        .with_field(text("entity", "Entity").required())
        .with_field(date("periodStart", "Period Start").required())
        .with_field(date("periodEnd", "Period End").required())
        .with_field(text("currency", "Currency").with_default("USD"))
        .with_section(lines)
        .with_signoff_roles(&["Prepared By", "Reviewed By"])
}

pub fn budget_variance() -> FormSchema {
    let lines = SectionDefinition::new(
        "lines",
        "Budget Lines",
        vec![
            text("lineItem", "Line Item").required(),
            number("base", "Budgeted").required().totaled(),
            number("high", "Actual").required().totaled(),
            number("variancePercent", "Variance %").read_only(),
        ],
    )
    .with_derivation(Derivation::new(
        "variancePercent",
        Formula::VariancePercent {
            base: "base".to_string(),
            high: "high".to_string(),
        },
    ));

    FormSchema::new(BUDGET_VARIANCE_ID, "Budget Variance Report")
        .with_category("Finance")
        .with_field(text("department", "Department").required())
        .with_field(number("fiscalYear", "Fiscal Year").required())
        .with_field(text("remarks", "Remarks"))
        .with_section(lines)
        .with_signoff_roles(&["Prepared By", "Approved By"])
}

pub fn invoice() -> FormSchema {
    let items = SectionDefinition::new(
        "items",
        "Line Items",
        vec![
            text("description", "Description").required(),
            number("qty", "Qty").required(),
            number("unitPrice", "Unit Price").required(),
            number("amount", "Amount").read_only().totaled(),
        ],
    )
    .with_derivation(Derivation::new(
        "amount",
        Formula::Product {
            factors: vec!["qty".to_string(), "unitPrice".to_string()],
        },
    ))
    .with_min_items(1);

    FormSchema::new(INVOICE_ID, "Invoice")
        .with_category("Billing")
        .with_field(text("invoiceNumber", "Invoice Number").required())
        .with_field(date("invoiceDate", "Invoice Date").required())
        .with_field(date("dueDate", "Due Date"))
        .with_field(text("customer", "Customer").required())
        .with_section(items)
        .with_signoff_roles(&["Issued By"])
}
