// src/forms/validation/mod.rs

pub mod rule_set;
pub mod validator;

pub use rule_set::{RuleEntry, RuleSet};
pub use validator::{validate, value_passes, ValidationResult, DATE_FORMAT};
