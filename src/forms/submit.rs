// src/forms/submit.rs
//! Hand-off of a validated form to whoever persists, prints or transmits it.

use bevy::prelude::{error, info};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use super::definitions::FormSchema;
use super::state::FormState;
use super::validation::ValidationResult;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub form_id: String,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn new(form_id: &str) -> Self {
        SubmissionReceipt {
            submission_id: Uuid::new_v4(),
            form_id: form_id.to_string(),
            submitted_at: Utc::now(),
        }
    }
}

/// Result of a submit attempt as seen by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; the handler was not called.
    Rejected(ValidationResult),
    Accepted(SubmissionReceipt),
    /// Validation passed but the handler reported a failure.
    Failed(String),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }
}

/// Receives the complete value tree once validation has passed.
pub trait SubmitHandler: Send + Sync {
    fn submit(&self, form: &FormSchema, state: &FormState) -> Result<SubmissionReceipt, SubmitError>;
}

/// Logs the submitted state and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSubmitHandler;

impl SubmitHandler for LogSubmitHandler {
    fn submit(&self, form: &FormSchema, state: &FormState) -> Result<SubmissionReceipt, SubmitError> {
        let json = serde_json::to_string(state)?;
        info!("Form '{}' submitted: {}", form.form_id, json);
        Ok(SubmissionReceipt::new(&form.form_id))
    }
}

/// Writes each submission to `<dir>/<form_id>-<submission_id>.json`.
#[derive(Debug, Clone)]
pub struct JsonExportSubmitHandler {
    pub dir: PathBuf,
}

impl JsonExportSubmitHandler {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonExportSubmitHandler { dir: dir.into() }
    }

    pub fn path_for(&self, receipt: &SubmissionReceipt) -> PathBuf {
        self.dir
            .join(format!("{}-{}.json", receipt.form_id, receipt.submission_id))
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    receipt: &'a SubmissionReceipt,
    title: &'a str,
    state: &'a FormState,
}

impl SubmitHandler for JsonExportSubmitHandler {
    fn submit(&self, form: &FormSchema, state: &FormState) -> Result<SubmissionReceipt, SubmitError> {
        let receipt = SubmissionReceipt::new(&form.form_id);
        if let Err(e) = fs::create_dir_all(&self.dir) {
            error!("Failed to ensure export directory '{:?}': {}", self.dir, e);
            return Err(e.into());
        }
        let path = self.path_for(&receipt);
        let file = fs::File::create(&path)?;
        let doc = ExportDocument {
            receipt: &receipt,
            title: &form.title,
            state,
        };
        serde_json::to_writer_pretty(BufWriter::new(file), &doc)?;
        info!("Exported submission of '{}' to {:?}", form.form_id, path);
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_writes_one_file_per_submission() {
        let dir = tempfile::tempdir().unwrap();
        let handler = JsonExportSubmitHandler::new(dir.path().join("out"));
        let schema = FormSchema::new("asset-receipt", "Asset Receipt");
        let mut state = FormState::from_schema(&schema);
        state.set("vendor", "Acme");

        let receipt = handler.submit(&schema, &state).unwrap();
        let written = fs::read_to_string(handler.path_for(&receipt)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(doc["state"]["fields"]["vendor"], "Acme");
        assert_eq!(doc["receipt"]["formId"], "asset-receipt");
        assert_eq!(doc["title"], "Asset Receipt");
    }

    #[test]
    fn receipts_are_unique() {
        let a = SubmissionReceipt::new("x");
        let b = SubmissionReceipt::new("x");
        assert_ne!(a.submission_id, b.submission_id);
    }
}
