// src/forms/definitions/field_data_type.rs
use serde::{
    de::{self, Deserializer},
    Deserialize, Serialize,
};
use std::fmt;

/// Input kind of a field. Values are always stored as strings; the kind only
/// drives parsing in validation and derivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum FieldDataType {
    #[default]
    Text,
    Number,
    Date,
}

impl fmt::Display for FieldDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// Accept the loose spellings found in hand-written form files
impl<'de> Deserialize<'de> for FieldDataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(deserializer)?;
        let as_str = match v {
            serde_json::Value::String(s) => s,
            other => {
                return Err(de::Error::custom(format!(
                    "FieldDataType must be string, got {}",
                    other
                )))
            }
        };
        parse_field_data_type(&as_str)
            .ok_or_else(|| de::Error::custom(format!("Unknown FieldDataType '{}'", as_str)))
    }
}

pub fn parse_field_data_type(s: &str) -> Option<FieldDataType> {
    match s.trim() {
        "Text" | "text" | "String" | "string" | "textarea" | "select" => Some(FieldDataType::Text),
        "Number" | "number" | "Numeric" | "numeric" | "F64" | "f64" | "currency" => {
            Some(FieldDataType::Number)
        }
        "Date" | "date" => Some(FieldDataType::Date),
        _ => None,
    }
}
