// src/cli/submit.rs
use std::path::Path;

use super::{load_session, validate, CliResult};
use crate::forms::resources::FormRegistry;
use crate::forms::submit::{JsonExportSubmitHandler, LogSubmitHandler, SubmitHandler, SubmitOutcome};

/// JSON export when a directory is given, otherwise log only.
pub fn handler_for(export_dir: Option<&Path>) -> Box<dyn SubmitHandler> {
    match export_dir {
        Some(dir) => Box::new(JsonExportSubmitHandler::new(dir)),
        None => Box::new(LogSubmitHandler),
    }
}

pub fn describe(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Accepted(receipt) => format!(
            "Submitted '{}' as {} at {}.\n",
            receipt.form_id,
            receipt.submission_id,
            receipt.submitted_at.to_rfc3339()
        ),
        SubmitOutcome::Rejected(result) => {
            format!("Not submitted.\n{}", validate::render(result))
        }
        SubmitOutcome::Failed(reason) => format!("Submission failed: {}\n", reason),
    }
}

/// Returns whether the submission was accepted.
pub fn run(
    registry: &FormRegistry,
    form_id: &str,
    state_path: &Path,
    export_dir: Option<&Path>,
) -> CliResult<bool> {
    let mut session = load_session(registry, form_id, state_path)?;
    let handler = handler_for(export_dir);
    let outcome = session.submit(handler.as_ref());
    print!("{}", describe(&outcome));
    Ok(outcome.is_accepted())
}
