// src/cli/mod.rs
// Command-line front end over the form engine

pub mod list;
pub mod new_form;
pub mod print;
pub mod replay;
pub mod settings;
pub mod submit;
pub mod validate;

use clap::{Parser, Subcommand};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::forms::error::FormError;
use crate::forms::resources::{FormRegistry, FormSession};
use crate::forms::state::FormState;
use crate::forms::submit::SubmitError;
use crate::forms::systems::io::{add_builtin_forms, add_forms_from_dir};
use crate::settings::AppSettings;

#[derive(Parser)]
#[command(name = "formdesk")]
#[command(about = "Formdesk - business form catalog with validation, table editing and signoffs", long_about = None)]
pub struct Cli {
    /// Load extra form schemas from this directory (overrides the settings file)
    #[arg(long, global = true)]
    pub forms_dir: Option<PathBuf>,

    /// Log at info level instead of warnings only
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the available forms, grouped by category
    List,

    /// Print a fresh, empty instance of a form as JSON
    New {
        form: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a saved form state
    Validate {
        form: String,
        /// Path to the state JSON
        state: PathBuf,
    },

    /// Validate and submit a saved form state
    Submit {
        form: String,
        state: PathBuf,
        /// Export accepted submissions as JSON into this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// Apply a scripted list of edits to a fresh form and print the result
    Replay {
        form: String,
        /// Path to a JSON array of actions
        actions: PathBuf,
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// Render a saved form state read-only
    Print { form: String, state: PathBuf },

    /// Show or change the stored settings
    Settings {
        #[arg(long)]
        set_forms_dir: Option<PathBuf>,
        #[arg(long)]
        set_export_dir: Option<PathBuf>,
        #[arg(long)]
        revalidate_on_change: Option<bool>,
        #[arg(long)]
        print_mode: Option<bool>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Unknown form '{0}'. Run `formdesk list` to see the available forms.")]
    UnknownForm(String),
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Action {index} is invalid: {reason}")]
    InvalidAction { index: usize, reason: String },
    #[error("Settings error: {0}")]
    Settings(#[source] io::Error),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

pub type CliResult<T> = Result<T, CliError>;

/// Built-in forms plus the ones found in the configured directory.
pub fn load_registry(settings: &AppSettings) -> FormRegistry {
    let mut registry = FormRegistry::default();
    add_builtin_forms(&mut registry);
    if let Some(dir) = &settings.forms_dir {
        add_forms_from_dir(&mut registry, dir);
    }
    registry
}

/// Reads a JSON document from disk.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<T> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Opens a session on a previously saved state of `form_id`.
pub fn load_session(registry: &FormRegistry, form_id: &str, state_path: &Path) -> CliResult<FormSession> {
    let schema = registry
        .schema(form_id)
        .cloned()
        .ok_or_else(|| CliError::UnknownForm(form_id.to_string()))?;
    let state: FormState = read_json(state_path)?;
    Ok(FormSession::with_state(schema, state)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_submit_with_export_dir() {
        let cli = Cli::try_parse_from([
            "formdesk",
            "submit",
            "invoice",
            "state.json",
            "--export-dir",
            "out",
        ])
        .unwrap();
        match cli.command {
            Commands::Submit {
                form, export_dir, ..
            } => {
                assert_eq!(form, "invoice");
                assert_eq!(export_dir, Some(PathBuf::from("out")));
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn registry_contains_builtin_forms() {
        let registry = load_registry(&AppSettings::default());
        assert!(registry.schema("invoice").is_some());
        assert!(registry.schema("cashFlowStatement").is_some());
    }

    #[test]
    fn load_session_rejects_state_of_another_form() {
        let dir = tempfile::tempdir().unwrap();
        let registry = load_registry(&AppSettings::default());
        let state = FormState::from_schema(registry.schema("invoice").unwrap());
        let path = dir.path().join("state.json");
        fs::write(&path, serde_json::to_string(&state).unwrap()).unwrap();

        assert!(load_session(&registry, "invoice", &path).is_ok());
        assert!(matches!(
            load_session(&registry, "assetReceipt", &path),
            Err(CliError::Form(FormError::InvalidSchema { .. }))
        ));
        assert!(matches!(
            load_session(&registry, "nope", &path),
            Err(CliError::UnknownForm(_))
        ));
    }
}
