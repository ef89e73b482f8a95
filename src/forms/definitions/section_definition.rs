// src/forms/definitions/section_definition.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::derivation::{recompute_row, Derivation};
use super::field_definition::FieldDefinition;

/// A repeatable table section: its base columns, computed cells and row bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionDefinition {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub derivations: Vec<Derivation>,
    #[serde(default)]
    pub min_items: usize,
    /// Rows created when the form is opened.
    #[serde(default = "default_rows")]
    pub default_rows: usize,
    #[serde(default = "default_true")]
    pub allow_dynamic_columns: bool,
}

fn default_rows() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl SectionDefinition {
    pub fn new(key: &str, label: &str, fields: Vec<FieldDefinition>) -> Self {
        SectionDefinition {
            key: key.to_string(),
            label: label.to_string(),
            fields,
            derivations: Vec::new(),
            min_items: 0,
            default_rows: default_rows(),
            allow_dynamic_columns: true,
        }
    }

    pub fn with_derivation(mut self, derivation: Derivation) -> Self {
        self.derivations.push(derivation);
        self
    }

    pub fn with_min_items(mut self, min_items: usize) -> Self {
        self.min_items = min_items;
        self
    }

    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn has_base_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Zero-valued base cells for a new row, with derived cells already computed.
    pub fn row_template(&self) -> BTreeMap<String, String> {
        let mut cells: BTreeMap<String, String> = self
            .fields
            .iter()
            .map(|f| (f.key.clone(), f.default.clone()))
            .collect();
        if !self.derivations.is_empty() {
            recompute_row(&self.derivations, &mut cells);
        }
        cells
    }

    /// True when editing `key` should trigger a recompute of the row: it is an
    /// input of some derivation, or a derived cell written directly.
    pub fn feeds_derivation(&self, key: &str) -> bool {
        self.derivations
            .iter()
            .any(|d| d.target == key || d.formula.inputs().contains(&key))
    }
}
