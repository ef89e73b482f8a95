// src/cli/settings.rs
use std::path::PathBuf;

use super::{CliError, CliResult};
use crate::settings::{io::save_settings_to_file, AppSettings};

#[derive(Debug, Default)]
pub struct SettingsChanges {
    pub forms_dir: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub revalidate_on_change: Option<bool>,
    pub print_mode: Option<bool>,
}

impl SettingsChanges {
    pub fn is_empty(&self) -> bool {
        self.forms_dir.is_none()
            && self.export_dir.is_none()
            && self.revalidate_on_change.is_none()
            && self.print_mode.is_none()
    }

    pub fn apply(self, settings: &mut AppSettings) {
        if let Some(dir) = self.forms_dir {
            settings.forms_dir = Some(dir);
        }
        if let Some(dir) = self.export_dir {
            settings.export_dir = Some(dir);
        }
        if let Some(flag) = self.revalidate_on_change {
            settings.revalidate_on_change = flag;
        }
        if let Some(flag) = self.print_mode {
            settings.print_mode = flag;
        }
    }
}

/// Prints the settings, saving them first when anything changed.
pub fn run(mut settings: AppSettings, changes: SettingsChanges) -> CliResult<()> {
    if !changes.is_empty() {
        changes.apply(&mut settings);
        save_settings_to_file(&settings).map_err(CliError::Settings)?;
    }
    let json = serde_json::to_string_pretty(&settings).map_err(|source| CliError::Json {
        path: PathBuf::new(),
        source,
    })?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_given_values_change() {
        let mut settings = AppSettings::default();
        let changes = SettingsChanges {
            export_dir: Some(PathBuf::from("out")),
            revalidate_on_change: Some(false),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        changes.apply(&mut settings);
        assert_eq!(settings.export_dir, Some(PathBuf::from("out")));
        assert!(!settings.revalidate_on_change);
        assert_eq!(settings.forms_dir, None);
        assert!(!settings.print_mode);
    }
}
