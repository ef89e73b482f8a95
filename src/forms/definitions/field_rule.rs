// src/forms/definitions/field_rule.rs
use serde::{
    de::{self, Deserializer},
    Deserialize, Serialize,
};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum FieldRule {
    /// Value must be a non-empty (after trimming) string.
    Required,
    /// Value must parse as a finite number. Empty values pass.
    Numeric,
    /// Value must parse as a `YYYY-MM-DD` calendar date. Empty values pass.
    Date,
    /// Section must hold at least this many rows.
    MinItems(usize),
}

impl FieldRule {
    pub fn applies_to_section(&self) -> bool {
        matches!(self, FieldRule::MinItems(_))
    }
}

// Accepts "required" / {"Required": null} / {"minItems": 2} / {"MinItems": 2}
impl<'de> Deserialize<'de> for FieldRule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if let Some(s) = value.as_str() {
            return parse_simple_rule(s)
                .ok_or_else(|| de::Error::custom(format!("Unknown FieldRule string '{}'.", s)));
        }
        if let Some(obj) = value.as_object() {
            if let Some((tag, inner)) = obj.iter().next().filter(|_| obj.len() == 1) {
                match tag.as_str() {
                    "MinItems" | "minItems" | "min_items" => {
                        let n = inner.as_u64().ok_or_else(|| {
                            de::Error::custom(format!("Invalid MinItems payload: {}", inner))
                        })?;
                        return Ok(FieldRule::MinItems(n as usize));
                    }
                    other => {
                        if let Some(rule) = parse_simple_rule(other) {
                            return Ok(rule);
                        }
                    }
                }
            }
        }
        Err(de::Error::custom("Unrecognized FieldRule representation"))
    }
}

fn parse_simple_rule(s: &str) -> Option<FieldRule> {
    match s.trim() {
        "Required" | "required" => Some(FieldRule::Required),
        "Numeric" | "numeric" | "number" => Some(FieldRule::Numeric),
        "Date" | "date" => Some(FieldRule::Date),
        _ => None,
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRule::Required => write!(f, "Required"),
            FieldRule::Numeric => write!(f, "Numeric"),
            FieldRule::Date => write!(f, "Date"),
            FieldRule::MinItems(n) => write!(f, "MinItems({})", n),
        }
    }
}
