// src/forms/systems/io/startup.rs
use bevy::prelude::*;
use std::path::Path;

use super::catalog::scan_schema_dir;
use crate::catalog_definitions::builtin_forms;
use crate::forms::resources::FormRegistry;
use crate::settings::AppSettings;

/// Adds every built-in form that is not registered yet. Returns how many were added.
pub fn add_builtin_forms(registry: &mut FormRegistry) -> usize {
    let mut count = 0;
    for schema in builtin_forms() {
        let form_id = schema.form_id.clone();
        match registry.register(schema) {
            Ok(true) => count += 1,
            Ok(false) => {}
            Err(e) => error!("Built-in form '{}' is invalid: {}", form_id, e),
        }
    }
    count
}

/// Loads all schema files under `dir`, replacing forms with the same id.
pub fn add_forms_from_dir(registry: &mut FormRegistry, dir: &Path) -> usize {
    let mut count = 0;
    for (path, schema) in scan_schema_dir(dir) {
        let form_id = schema.form_id.clone();
        match registry.add_or_replace(schema) {
            Ok(()) => {
                count += 1;
                debug!("Loaded form '{}' from {:?}", form_id, path);
            }
            Err(e) => warn!("Form '{}' from {:?} rejected: {}", form_id, path, e),
        }
    }
    count
}

pub fn register_builtin_forms(mut registry: ResMut<FormRegistry>) {
    let count = add_builtin_forms(&mut registry);
    info!("Registered {} built-in form(s).", count);
}

/// Files in the forms directory override built-ins with the same id.
pub fn scan_forms_directory(mut registry: ResMut<FormRegistry>, settings: Option<Res<AppSettings>>) {
    let Some(dir) = settings.as_ref().and_then(|s| s.forms_dir.clone()) else {
        trace!("No forms directory configured. Skipping catalog scan.");
        return;
    };
    info!("Startup Scan: scanning {:?} for form schemas...", dir);
    let count = add_forms_from_dir(&mut registry, &dir);
    info!("Startup Scan: loaded {} form(s) from {:?}.", count, dir);
}
