// src/forms/mod.rs

pub mod definitions;
pub mod error;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod state;
pub mod submit;
pub mod table;
pub mod validation;

pub(crate) mod systems;

pub use definitions::{FieldDataType, FieldDefinition, FieldRule, FormSchema, SectionDefinition};
pub use error::{FormError, FormResult};
pub use plugin::{FormSystemSet, FormsPlugin};
pub use resources::{ActiveSubmitHandler, FormRegistry, FormSession};
pub use state::{FieldPath, FormState, RowId};
pub use submit::{JsonExportSubmitHandler, LogSubmitHandler, SubmitHandler, SubmitOutcome};
pub use validation::{RuleSet, ValidationResult};
