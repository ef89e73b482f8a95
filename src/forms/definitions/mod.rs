// src/forms/definitions/mod.rs

pub mod derivation;
pub mod field_data_type;
pub mod field_definition;
pub mod field_rule;
pub mod form_schema;
pub mod section_definition;

pub use derivation::{format_amount, parse_amount, Derivation, Formula};
pub use field_data_type::FieldDataType;
pub use field_definition::FieldDefinition;
pub use field_rule::FieldRule;
pub use form_schema::{FormSchema, RESERVED_KEYS};
pub use section_definition::SectionDefinition;
