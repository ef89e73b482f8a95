// src/forms/state/path.rs
//! Dot/bracket locators into a `FormState`, e.g. `vendor`, `items[2].remarks`,
//! `items[2].dynamicFields.costCenter` or `items[*].amount` in rule sets.

use std::fmt;
use std::str::FromStr;

use crate::forms::error::FormError;

pub const DYNAMIC_FIELDS: &str = "dynamicFields";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowSelector {
    Index(usize),
    /// `[*]`, only meaningful in rule patterns.
    Each,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellKey {
    Base(String),
    Dynamic(String),
}

impl CellKey {
    /// Reads a row-relative locator: a base column key or `dynamicFields.<key>`.
    pub fn parse(field: &str) -> Option<CellKey> {
        match field.split_once('.') {
            None if !field.is_empty() => Some(CellKey::Base(field.to_string())),
            Some((DYNAMIC_FIELDS, key)) if !key.is_empty() && !key.contains('.') => {
                Some(CellKey::Dynamic(key.to_string()))
            }
            _ => None,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            CellKey::Base(k) | CellKey::Dynamic(k) => k,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
    /// A top-level name: a scalar field, or a whole section.
    Field(String),
    /// One cell of one row of a repeatable section.
    Cell {
        section: String,
        row: RowSelector,
        cell: CellKey,
    },
}

impl FieldPath {
    pub fn parse(raw: &str) -> Result<Self, FormError> {
        let fail = |reason: &str| FormError::invalid_path(raw, reason);
        let parts: Vec<&str> = raw.split('.').collect();

        let (head_name, head_index) = split_segment(parts[0]).ok_or_else(|| fail("bad segment"))?;
        let rest = &parts[1..];

        let row = match head_index {
            None => {
                return if rest.is_empty() {
                    Ok(FieldPath::Field(head_name.to_string()))
                } else {
                    Err(fail("nested path without a row index"))
                };
            }
            Some(row) => row,
        };

        let cell = match rest {
            [] => return Err(fail("row path needs a cell name")),
            [single] => {
                let (name, idx) = split_segment(single).ok_or_else(|| fail("bad segment"))?;
                if idx.is_some() {
                    return Err(fail("only the section segment may carry an index"));
                }
                if name == DYNAMIC_FIELDS {
                    return Err(fail("dynamicFields needs a column key"));
                }
                CellKey::Base(name.to_string())
            }
            [map, key] if *map == DYNAMIC_FIELDS => {
                if !is_valid_segment_name(key) {
                    return Err(fail("bad dynamic column key"));
                }
                CellKey::Dynamic(key.to_string())
            }
            _ => return Err(fail("too many segments")),
        };

        Ok(FieldPath::Cell {
            section: head_name.to_string(),
            row,
            cell,
        })
    }

    /// The top-level key this path lives under.
    pub fn root(&self) -> &str {
        match self {
            FieldPath::Field(name) => name,
            FieldPath::Cell { section, .. } => section,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            FieldPath::Cell {
                row: RowSelector::Each,
                ..
            }
        )
    }

    /// Pins a `[*]` pattern to one row index.
    pub fn at_row(&self, index: usize) -> FieldPath {
        match self {
            FieldPath::Cell { section, cell, .. } => FieldPath::Cell {
                section: section.clone(),
                row: RowSelector::Index(index),
                cell: cell.clone(),
            },
            other => other.clone(),
        }
    }

    pub fn cell(section: &str, index: usize, key: &str) -> FieldPath {
        FieldPath::Cell {
            section: section.to_string(),
            row: RowSelector::Index(index),
            cell: CellKey::Base(key.to_string()),
        }
    }

    pub fn dynamic_cell(section: &str, index: usize, key: &str) -> FieldPath {
        FieldPath::Cell {
            section: section.to_string(),
            row: RowSelector::Index(index),
            cell: CellKey::Dynamic(key.to_string()),
        }
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Field(name) => write!(f, "{}", name),
            FieldPath::Cell { section, row, cell } => {
                match row {
                    RowSelector::Index(i) => write!(f, "{}[{}]", section, i)?,
                    RowSelector::Each => write!(f, "{}[*]", section)?,
                }
                match cell {
                    CellKey::Base(k) => write!(f, ".{}", k),
                    CellKey::Dynamic(k) => write!(f, ".{}.{}", DYNAMIC_FIELDS, k),
                }
            }
        }
    }
}

/// Names may not be empty or contain path punctuation or whitespace.
pub fn is_valid_segment_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c == '.' || c == '[' || c == ']' || c.is_whitespace())
}

fn split_segment(segment: &str) -> Option<(&str, Option<RowSelector>)> {
    match segment.find('[') {
        None => is_valid_segment_name(segment).then_some((segment, None)),
        Some(open) => {
            let name = &segment[..open];
            let inner = segment[open + 1..].strip_suffix(']')?;
            if !is_valid_segment_name(name) {
                return None;
            }
            let selector = if inner == "*" {
                RowSelector::Each
            } else {
                RowSelector::Index(inner.parse::<usize>().ok()?)
            };
            Some((name, Some(selector)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalar_and_cells() {
        assert_eq!(
            FieldPath::parse("receiptDate").unwrap(),
            FieldPath::Field("receiptDate".into())
        );
        assert_eq!(
            FieldPath::parse("items[2].remarks").unwrap(),
            FieldPath::cell("items", 2, "remarks")
        );
        assert_eq!(
            FieldPath::parse("items[2].dynamicFields.costCenter").unwrap(),
            FieldPath::dynamic_cell("items", 2, "costCenter")
        );
    }

    #[test]
    fn cell_key_reads_base_and_dynamic_locators() {
        assert_eq!(CellKey::parse("qty"), Some(CellKey::Base("qty".into())));
        assert_eq!(
            CellKey::parse("dynamicFields.costCenter"),
            Some(CellKey::Dynamic("costCenter".into()))
        );
        assert_eq!(CellKey::parse(""), None);
        assert_eq!(CellKey::parse("dynamicFields."), None);
        assert_eq!(CellKey::parse("a.b"), None);
    }

    #[test]
    fn display_round_trips() {
        for raw in ["vendor", "items[0].qty", "items[*].amount", "items[3].dynamicFields.cc"] {
            assert_eq!(FieldPath::parse(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn rejects_malformed_paths() {
        for raw in [
            "",
            "items[",
            "items[x].qty",
            "items[1]",
            "items.qty",
            "items[1].dynamicFields",
            "items[1].a.b",
            "items[1].qty[2]",
            "a b",
        ] {
            assert!(FieldPath::parse(raw).is_err(), "{} should be rejected", raw);
        }
    }

    #[test]
    fn pattern_pins_to_row() {
        let p = FieldPath::parse("items[*].amount").unwrap();
        assert!(p.is_pattern());
        assert_eq!(p.at_row(4).to_string(), "items[4].amount");
    }
}
