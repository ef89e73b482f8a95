// src/forms/systems/io/catalog.rs
use bevy::prelude::*;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::forms::definitions::FormSchema;

/// Reads one schema file and runs the structural checks on it.
pub fn load_schema_file(path: &Path) -> Result<FormSchema, String> {
    let file = fs::File::open(path).map_err(|e| format!("Failed to open '{}': {}", path.display(), e))?;
    let schema: FormSchema = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
    schema.check().map_err(|e| e.to_string())?;
    Ok(schema)
}

/// Recursively loads every `*.json` under `dir`. Files that fail to load are
/// logged and skipped; a missing directory yields nothing.
pub fn scan_schema_dir(dir: &Path) -> Vec<(PathBuf, FormSchema)> {
    if !dir.exists() {
        info!("Form catalog: directory {:?} does not exist. Nothing to scan.", dir);
        return Vec::new();
    }

    let mut candidates: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    candidates.sort();
    trace!("Form catalog: candidate files {:?}", candidates);

    let mut loaded = Vec::new();
    for path in candidates {
        match load_schema_file(&path) {
            Ok(schema) => loaded.push((path, schema)),
            Err(e) => warn!("Form catalog: skipping {:?}: {}", path, e),
        }
    }
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_nested_files_and_skips_bad_ones() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("treasury");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            nested.join("fx-request.json"),
            r#"{"formId": "fx-request", "title": "FX Request"}"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(
            dir.path().join("dup-keys.json"),
            r#"{"formId": "d", "title": "D", "fields": [
                {"key": "a", "label": "A"}, {"key": "a", "label": "A2"}]}"#,
        )
        .unwrap();

        let loaded = scan_schema_dir(dir.path());
        let ids: Vec<&str> = loaded.iter().map(|(_, s)| s.form_id.as_str()).collect();
        assert_eq!(ids, vec!["fx-request"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_schema_dir(&dir.path().join("absent")).is_empty());
    }
}
