// src/forms/error.rs

use thiserror::Error;

/// Errors raised by the form engine.
///
/// `DuplicateColumnKey`, `EmptyColumnKey`, `InvalidColumnKey` and
/// `IndexOutOfBounds` are user-facing
/// and recovered where they occur. `InvalidPath` and `MalformedRule` point at a
/// broken form definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("a column with key '{key}' already exists in table '{table}'")]
    DuplicateColumnKey { table: String, key: String },

    #[error("column label '{label}' does not produce a usable key")]
    EmptyColumnKey { label: String },

    #[error("column label '{label}' gives key '{key}', which may not contain '.', '[' or ']'")]
    InvalidColumnKey { label: String, key: String },

    #[error("table '{0}' does not accept extra columns")]
    DynamicColumnsDisabled(String),

    #[error("index {index} out of bounds ({len} entries) in '{target}'")]
    IndexOutOfBounds {
        target: String,
        index: usize,
        len: usize,
    },

    #[error("row {row_id} not found in table '{table}'")]
    RowNotFound { table: String, row_id: u64 },

    #[error("malformed rule '{rule}' on '{path}': {reason}")]
    MalformedRule {
        path: String,
        rule: String,
        reason: String,
    },

    #[error("invalid form schema '{form_id}': {reason}")]
    InvalidSchema { form_id: String, reason: String },

    #[error("form '{0}' not found")]
    FormNotFound(String),
}

impl FormError {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        FormError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the calling form definition rather than the user.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            FormError::InvalidPath { .. }
                | FormError::MalformedRule { .. }
                | FormError::InvalidSchema { .. }
        )
    }
}

pub type FormResult<T> = Result<T, FormError>;
