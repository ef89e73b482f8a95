// src/forms/definitions/field_definition.rs
use serde::{Deserialize, Serialize};

use super::field_data_type::FieldDataType;
use super::field_rule::FieldRule;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub data_type: FieldDataType,
    #[serde(default)]
    pub rules: Vec<FieldRule>,
    #[serde(default)]
    pub default: String,
    /// Computed by a derivation; never edited directly.
    #[serde(default)]
    pub read_only: bool,
    /// Printed with a column total under its section.
    #[serde(default)]
    pub totaled: bool,
}

impl FieldDefinition {
    pub fn new(key: &str, label: &str, data_type: FieldDataType) -> Self {
        FieldDefinition {
            key: key.to_string(),
            label: label.to_string(),
            data_type,
            rules: Vec::new(),
            default: String::new(),
            read_only: false,
            totaled: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.push_rule(FieldRule::Required);
        self
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default = default.to_string();
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn totaled(mut self) -> Self {
        self.totaled = true;
        self
    }

    /// Rules implied by the data type plus the declared ones, without duplicates.
    pub fn effective_rules(&self) -> Vec<FieldRule> {
        let mut rules = self.rules.clone();
        let implied = match self.data_type {
            FieldDataType::Number => Some(FieldRule::Numeric),
            FieldDataType::Date => Some(FieldRule::Date),
            FieldDataType::Text => None,
        };
        if let Some(rule) = implied {
            if !rules.contains(&rule) {
                rules.push(rule);
            }
        }
        rules
    }

    fn push_rule(&mut self, rule: FieldRule) {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
    }
}
