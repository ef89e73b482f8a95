// src/forms/table/column_key.rs
use unicode_normalization::UnicodeNormalization;

/// Derives a dynamic column key from a user-typed label: NFC-normalize, then drop
/// every whitespace character. Case is kept, so "Cost Center", "CostCenter" and
/// "Cost  Center" all map to `CostCenter` while "costcenter" does not.
pub fn derive_column_key(label: &str) -> String {
    label.nfc().filter(|c| !c.is_whitespace()).collect()
}
