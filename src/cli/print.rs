// src/cli/print.rs
use std::path::Path;

use super::{load_session, CliResult};
use crate::forms::definitions::FormSchema;
use crate::forms::resources::FormRegistry;
use crate::forms::state::{FormState, SignaturePayload};

fn is_signed(payload: &SignaturePayload) -> bool {
    match payload {
        serde_json::Value::Null => false,
        serde_json::Value::Object(map) => !map.is_empty(),
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Read-only rendering of every value of the form.
pub fn render(schema: &FormSchema, state: &FormState) -> String {
    let mut out = format!("== {} ({}) ==\n", schema.title, schema.form_id);

    for field in &schema.fields {
        out.push_str(&format!("{}: {}\n", field.label, state.get(&field.key)));
    }

    for section in &schema.sections {
        out.push_str(&format!("\n-- {} --\n", section.label));
        let Some(table) = state.table(&section.key) else {
            continue;
        };
        if table.is_empty() {
            out.push_str("  (no rows)\n");
            continue;
        }
        for (i, row) in table.rows.iter().enumerate() {
            let mut cells: Vec<String> = section
                .fields
                .iter()
                .map(|f| {
                    let value = row.cells.get(&f.key).map(String::as_str).unwrap_or("");
                    format!("{}: {}", f.label, value)
                })
                .collect();
            cells.extend(table.columns.iter().map(|c| {
                let value = row
                    .dynamic_fields
                    .get(&c.key)
                    .map(String::as_str)
                    .unwrap_or("");
                format!("{}: {}", c.label, value)
            }));
            out.push_str(&format!("  #{:<3} {}\n", i + 1, cells.join(" | ")));
        }
        for field in section.fields.iter().filter(|f| f.totaled) {
            out.push_str(&format!(
                "  Total {}: {}\n",
                field.label,
                table.column_total(&field.key)
            ));
        }
    }

    if !state.signoffs.is_empty() {
        out.push_str("\nSignoffs:\n");
        for role in &state.signoffs.roles {
            let status = if is_signed(&role.data) { "signed" } else { "pending" };
            out.push_str(&format!("  {}: {}\n", role.role_name, status));
        }
    }
    if !state.attachments.is_empty() {
        out.push_str("\nAttachments:\n");
        for attachment in &state.attachments {
            out.push_str(&format!("  {} ({})\n", attachment.name, attachment.reference));
        }
    }
    if !state.custom_fields.is_empty() {
        out.push_str("\nAdditional fields:\n");
        for field in &state.custom_fields {
            out.push_str(&format!("  {}: {}\n", field.label, field.value));
        }
    }
    out
}

pub fn run(registry: &FormRegistry, form_id: &str, state_path: &Path) -> CliResult<()> {
    let session = load_session(registry, form_id, state_path)?;
    print!("{}", render(session.schema(), session.state()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_definitions::invoice;
    use crate::forms::resources::FormSession;
    use serde_json::json;

    #[test]
    fn renders_rows_totals_and_signoffs() {
        let mut session = FormSession::new(invoice()).unwrap();
        session.state_mut().set("customer", "Acme");
        {
            let mut editor = session.table("items").unwrap();
            editor.edit_cell(0, "qty", "2").unwrap();
            editor.edit_cell(0, "unitPrice", "10").unwrap();
            editor.add_row();
            editor.edit_cell(1, "qty", "1").unwrap();
            editor.edit_cell(1, "unitPrice", "5.5").unwrap();
        }
        session
            .state_mut()
            .signoffs
            .set_data(0, json!({"signature": "data:image/png;base64,AAAA"}))
            .unwrap();

        let text = render(session.schema(), session.state());
        assert!(text.starts_with("== Invoice (invoice) ==\n"));
        assert!(text.contains("Customer: Acme\n"));
        assert!(text.contains("Qty: 2 | Unit Price: 10 | Amount: 20.00"));
        assert!(text.contains("Total Amount: 25.50"));
        assert!(text.contains("Issued By: signed"));
        assert!(!text.contains("Attachments:"));
    }

    #[test]
    fn only_totaled_columns_get_totals() {
        let mut session = FormSession::new(crate::catalog_definitions::budget_variance()).unwrap();
        {
            let mut editor = session.table("lines").unwrap();
            editor.edit_cell(0, "base", "200").unwrap();
            editor.edit_cell(0, "high", "250").unwrap();
            editor.add_row();
            editor.edit_cell(1, "base", "100").unwrap();
            editor.edit_cell(1, "high", "110").unwrap();
        }

        let text = render(session.schema(), session.state());
        assert!(text.contains("Total Budgeted: 300.00"));
        assert!(text.contains("Total Actual: 360.00"));
        assert!(!text.contains("Total Variance %"));
    }

    #[test]
    fn empty_payload_is_pending() {
        assert!(!is_signed(&json!({})));
        assert!(!is_signed(&serde_json::Value::Null));
        assert!(is_signed(&json!("sig")));
    }
}
