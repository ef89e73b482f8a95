// src/forms/state/appendix.rs
//! Form-wide extras owned by external widgets: attachment references and
//! ad hoc label/value pairs. Stored and forwarded as-is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
    pub name: String,
    /// Whatever the attachment manager uses to find the file again.
    pub reference: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub label: String,
    #[serde(default)]
    pub value: String,
}
