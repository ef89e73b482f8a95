// src/cli/validate.rs
use std::path::Path;

use super::{load_session, CliResult};
use crate::forms::resources::FormRegistry;
use crate::forms::validation::ValidationResult;

pub fn render(result: &ValidationResult) -> String {
    if result.valid {
        return "Valid.\n".to_string();
    }
    let mut out = format!("{} error(s):\n", result.errors.len());
    for (path, message) in &result.errors {
        out.push_str(&format!("  {:<32} {}\n", path, message));
    }
    out
}

/// Returns whether the state is valid.
pub fn run(registry: &FormRegistry, form_id: &str, state_path: &Path) -> CliResult<bool> {
    let mut session = load_session(registry, form_id, state_path)?;
    let result = session.validate();
    print!("{}", render(result));
    Ok(result.valid)
}
