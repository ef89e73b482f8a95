// src/cli/new_form.rs
use std::fs;
use std::path::Path;

use super::{CliError, CliResult};
use crate::forms::resources::FormRegistry;
use crate::forms::state::FormState;

pub fn run(registry: &FormRegistry, form_id: &str, output: Option<&Path>) -> CliResult<()> {
    let schema = registry
        .schema(form_id)
        .ok_or_else(|| CliError::UnknownForm(form_id.to_string()))?;
    let state = FormState::from_schema(schema);
    let json = serde_json::to_string_pretty(&state).map_err(|source| CliError::Json {
        path: output.map(Path::to_path_buf).unwrap_or_default(),
        source,
    })?;
    match output {
        Some(path) => {
            fs::write(path, json).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            println!("Wrote a new '{}' to {}", form_id, path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
