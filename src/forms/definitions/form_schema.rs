// src/forms/definitions/form_schema.rs
use bevy::prelude::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::field_definition::FieldDefinition;
use super::section_definition::SectionDefinition;
use crate::forms::error::{FormError, FormResult};
use crate::forms::state::path::is_valid_segment_name;

/// Keys of `FormState` that forms may not reuse for their own fields.
pub const RESERVED_KEYS: &[&str] = &["attachments", "customFields", "signoffs", "dynamicFields"];

/// Declarative description of one business form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub form_id: String,
    pub title: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub sections: Vec<SectionDefinition>,
    /// Role names the signoff block starts with, e.g. "Prepared By".
    #[serde(default)]
    pub signoff_roles: Vec<String>,
}

impl FormSchema {
    pub fn new(form_id: &str, title: &str) -> Self {
        FormSchema {
            form_id: form_id.to_string(),
            title: title.to_string(),
            category: None,
            fields: Vec::new(),
            sections: Vec::new(),
            signoff_roles: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_section(mut self, section: SectionDefinition) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_signoff_roles(mut self, roles: &[&str]) -> Self {
        self.signoff_roles = roles.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn section(&self, key: &str) -> Option<&SectionDefinition> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// Structural checks run when a schema is registered.
    pub fn check(&self) -> FormResult<()> {
        let fail = |reason: String| FormError::InvalidSchema {
            form_id: self.form_id.clone(),
            reason,
        };

        if self.form_id.trim().is_empty() {
            return Err(fail("form id is empty".to_string()));
        }
        // Ids name export files, so they must stay a single path component.
        if !is_valid_segment_name(&self.form_id) || self.form_id.contains(['/', '\\']) {
            return Err(fail(format!("'{}' is not a valid form id", self.form_id)));
        }

        let mut top_level: HashSet<&str> = HashSet::new();
        let keys = self
            .fields
            .iter()
            .map(|f| f.key.as_str())
            .chain(self.sections.iter().map(|s| s.key.as_str()));
        for key in keys {
            if !is_valid_segment_name(key) {
                return Err(fail(format!("'{}' is not a valid field key", key)));
            }
            if RESERVED_KEYS.contains(&key) {
                return Err(fail(format!("'{}' is a reserved key", key)));
            }
            if !top_level.insert(key) {
                return Err(fail(format!("key '{}' is declared twice", key)));
            }
        }

        for section in &self.sections {
            let mut cell_keys: HashSet<&str> = HashSet::new();
            for field in &section.fields {
                if !is_valid_segment_name(&field.key) || field.key == "dynamicFields" {
                    return Err(fail(format!(
                        "'{}' is not a valid column key in section '{}'",
                        field.key, section.key
                    )));
                }
                if !cell_keys.insert(field.key.as_str()) {
                    return Err(fail(format!(
                        "column '{}' is declared twice in section '{}'",
                        field.key, section.key
                    )));
                }
            }
            for derivation in &section.derivations {
                let unknown = derivation
                    .formula
                    .inputs()
                    .into_iter()
                    .chain(std::iter::once(derivation.target.as_str()))
                    .find(|k| !cell_keys.contains(k));
                if let Some(key) = unknown {
                    return Err(fail(format!(
                        "derivation for '{}' in section '{}' refers to unknown column '{}'",
                        derivation.target, section.key, key
                    )));
                }
                if section
                    .field(&derivation.target)
                    .map(|f| !f.read_only)
                    .unwrap_or(false)
                {
                    warn!(
                        "Form '{}': derived column '{}.{}' is not marked read-only.",
                        self.form_id, section.key, derivation.target
                    );
                }
            }
        }
        Ok(())
    }
}
