pub mod io;

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Resource)]
#[serde(default)]
pub struct AppSettings {
    /// Extra form schemas (`*.json`) are loaded from here at startup.
    pub forms_dir: Option<PathBuf>,
    /// When set, submissions are exported as JSON into this directory.
    pub export_dir: Option<PathBuf>,
    /// Re-validate after every edit instead of only on submit.
    pub revalidate_on_change: bool,
    /// Render values read-only.
    pub print_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            forms_dir: None,
            export_dir: None,
            revalidate_on_change: true,
            print_mode: false,
        }
    }
}
