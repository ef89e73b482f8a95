// src/forms/validation/validator.rs
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::rule_set::{RuleEntry, RuleSet};
use crate::forms::definitions::FieldRule;
use crate::forms::state::{FieldPath, FormState, RowSelector};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// Concrete path to message. Ordered, so two runs over the same state compare equal.
    pub errors: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn error_for(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    pub fn summary(&self) -> String {
        if self.valid {
            "✓ no validation errors".to_string()
        } else {
            format!("⚠ {} validation error(s)", self.errors.len())
        }
    }
}

/// Runs every rule and collects all failures. Pure; never panics.
pub fn validate(state: &FormState, rules: &RuleSet) -> ValidationResult {
    let mut errors: BTreeMap<String, String> = BTreeMap::new();

    for entry in rules.entries() {
        match (&entry.path, entry.rule) {
            (FieldPath::Field(section), FieldRule::MinItems(min)) => {
                if state.section_len(section) < min {
                    errors
                        .entry(section.clone())
                        .or_insert_with(|| rule_message(entry, &entry.label));
                }
            }
            (
                FieldPath::Cell {
                    section,
                    row: RowSelector::Each,
                    ..
                },
                _,
            ) => {
                for index in 0..state.section_len(section) {
                    let concrete = entry.path.at_row(index);
                    let label = format!("{} (row {})", entry.label, index + 1);
                    check_path(state, entry, &concrete, &label, &mut errors);
                }
            }
            (path, _) => check_path(state, entry, path, &entry.label, &mut errors),
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

impl RuleSet {
    pub fn validate(&self, state: &FormState) -> ValidationResult {
        validate(state, self)
    }
}

fn check_path(
    state: &FormState,
    entry: &RuleEntry,
    path: &FieldPath,
    label: &str,
    errors: &mut BTreeMap<String, String>,
) {
    let value = state.get_path(path).unwrap_or_default();
    if !value_passes(entry.rule, &value) {
        // First failing rule per path wins
        errors
            .entry(path.to_string())
            .or_insert_with(|| rule_message(entry, label));
    }
}

pub fn value_passes(rule: FieldRule, value: &str) -> bool {
    let trimmed = value.trim();
    match rule {
        FieldRule::Required => !trimmed.is_empty(),
        FieldRule::Numeric => trimmed.is_empty() || is_number(trimmed),
        FieldRule::Date => trimmed.is_empty() || NaiveDate::parse_from_str(trimmed, DATE_FORMAT).is_ok(),
        // Row counts are checked against the section, not a value
        FieldRule::MinItems(_) => true,
    }
}

fn is_number(value: &str) -> bool {
    value.parse::<f64>().map(|v| v.is_finite()).unwrap_or(false)
}

fn rule_message(entry: &RuleEntry, label: &str) -> String {
    match entry.rule {
        FieldRule::Required => format!("{} is required.", label),
        FieldRule::Numeric => format!("{} must be a number.", label),
        FieldRule::Date => format!("{} must be a valid date (YYYY-MM-DD).", label),
        FieldRule::MinItems(1) => format!("{} needs at least 1 row.", label),
        FieldRule::MinItems(n) => format!("{} needs at least {} rows.", label, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::definitions::{FieldDataType, FieldDefinition, FormSchema, SectionDefinition};

    fn schema() -> FormSchema {
        FormSchema::new("treasury-request", "Treasury Request")
            .with_field(FieldDefinition::new("name", "Name", FieldDataType::Text).required())
            .with_field(FieldDefinition::new("amount", "Amount", FieldDataType::Number).required())
            .with_field(FieldDefinition::new("valueDate", "Value Date", FieldDataType::Date))
            .with_section(
                SectionDefinition::new(
                    "items",
                    "Items",
                    vec![FieldDefinition::new("qty", "Qty", FieldDataType::Number)],
                )
                .with_min_items(1),
            )
    }

    #[test]
    fn reports_every_failure_at_once() {
        let schema = schema();
        let mut state = FormState::from_schema(&schema);
        state.set("amount", "ten");
        state.set("valueDate", "2024-02-30");
        state.set("items[0].qty", "1,5");

        let result = validate(&state, &schema.ruleset().unwrap());
        assert!(!result.valid);
        assert_eq!(result.error_for("name"), Some("Name is required."));
        assert_eq!(result.error_for("amount"), Some("Amount must be a number."));
        assert_eq!(
            result.error_for("valueDate"),
            Some("Value Date must be a valid date (YYYY-MM-DD).")
        );
        assert_eq!(result.error_for("items[0].qty"), Some("Qty (row 1) must be a number."));
        assert_eq!(result.errors.len(), 4);
    }

    #[test]
    fn revalidation_is_idempotent() {
        let schema = schema();
        let state = FormState::from_schema(&schema);
        let rules = schema.ruleset().unwrap();
        assert_eq!(validate(&state, &rules), validate(&state, &rules));
    }

    #[test]
    fn min_items_error_clears_independently() {
        let schema = schema();
        let rules = schema.ruleset().unwrap();
        let mut state = FormState::from_schema(&schema);
        state.remove_row("items", 0);

        let before = validate(&state, &rules);
        assert_eq!(before.error_for("items"), Some("Items needs at least 1 row."));
        assert!(before.error_for("name").is_some());

        state.append_row("items", Default::default());
        let after = validate(&state, &rules);
        assert!(after.error_for("items").is_none());
        assert_eq!(after.error_for("name"), before.error_for("name"));
    }

    #[test]
    fn empty_values_only_fail_required() {
        assert!(value_passes(FieldRule::Numeric, ""));
        assert!(value_passes(FieldRule::Date, "  "));
        assert!(!value_passes(FieldRule::Required, "   "));
        assert!(!value_passes(FieldRule::Numeric, "NaN"));
        assert!(value_passes(FieldRule::Numeric, " -12.5 "));
        assert!(value_passes(FieldRule::Date, "2024-02-29"));
    }
}
