// src/forms/state/mod.rs

pub mod appendix;
pub mod form_state;
pub mod path;
pub mod signoff;
pub mod table_state;

pub use appendix::{AttachmentRef, CustomField};
pub use form_state::FormState;
pub use path::{CellKey, FieldPath, RowSelector};
pub use signoff::{SignaturePayload, SignoffBlock, SignoffRole};
pub use table_state::{DynamicColumn, Row, RowId, TableState};
