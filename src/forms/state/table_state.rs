// src/forms/state/table_state.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::path::CellKey;
use crate::forms::definitions::{format_amount, parse_amount};
use crate::forms::error::{FormError, FormResult};

/// Stable row identity, assigned once when the row is created and never reused
/// within its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A user-added column. `key` is the whitespace-free form of `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicColumn {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub id: RowId,
    #[serde(default)]
    pub cells: BTreeMap<String, String>,
    /// Values for dynamic columns. A missing key reads as empty.
    #[serde(default)]
    pub dynamic_fields: BTreeMap<String, String>,
}

impl Row {
    pub fn get(&self, cell: &CellKey) -> Option<&str> {
        match cell {
            CellKey::Base(k) => self.cells.get(k),
            CellKey::Dynamic(k) => self.dynamic_fields.get(k),
        }
        .map(String::as_str)
    }

    pub fn set(&mut self, cell: &CellKey, value: String) {
        match cell {
            CellKey::Base(k) => self.cells.insert(k.clone(), value),
            CellKey::Dynamic(k) => self.dynamic_fields.insert(k.clone(), value),
        };
    }
}

/// One repeatable section: its rows plus the dynamic column set that belongs to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    #[serde(default)]
    pub columns: Vec<DynamicColumn>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub next_row_id: u64,
}

impl TableState {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c.key == key)
    }

    /// Appends a row built from `cells`, with an empty entry for every dynamic column.
    pub fn push_row(&mut self, cells: BTreeMap<String, String>) -> RowId {
        let id = self.allocate_id();
        let dynamic_fields = self
            .columns
            .iter()
            .map(|c| (c.key.clone(), String::new()))
            .collect();
        self.rows.push(Row {
            id,
            cells,
            dynamic_fields,
        });
        id
    }

    pub fn remove_row_at(&mut self, index: usize) -> FormResult<Row> {
        if index >= self.rows.len() {
            return Err(FormError::IndexOutOfBounds {
                target: "rows".to_string(),
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    pub fn index_of(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    pub fn row_id_at(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(|r| r.id)
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn row_mut(&mut self, id: RowId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|r| r.id == id)
    }

    /// Sum of a base column across all rows, two decimals.
    pub fn column_total(&self, key: &str) -> String {
        let total: f64 = self
            .rows
            .iter()
            .map(|r| parse_amount(r.cells.get(key).map(String::as_str).unwrap_or("")))
            .sum();
        format_amount(total)
    }

    // Tables loaded from disk may carry a stale counter.
    fn allocate_id(&mut self) -> RowId {
        let floor = self.rows.iter().map(|r| r.id.0 + 1).max().unwrap_or(0);
        let id = self.next_row_id.max(floor);
        self.next_row_id = id + 1;
        RowId(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut table = TableState::default();
        let a = table.push_row(cells(&[]));
        let b = table.push_row(cells(&[]));
        table.remove_row_at(1).unwrap();
        let c = table.push_row(cells(&[]));
        assert_ne!(b, c);
        assert_eq!(table.index_of(a), Some(0));
        assert_eq!(table.index_of(c), Some(1));
    }

    #[test]
    fn stale_counter_is_repaired() {
        let mut table = TableState {
            rows: vec![Row {
                id: RowId(7),
                cells: BTreeMap::new(),
                dynamic_fields: BTreeMap::new(),
            }],
            ..Default::default()
        };
        assert_eq!(table.push_row(BTreeMap::new()), RowId(8));
    }

    #[test]
    fn column_total_sums_numeric_cells() {
        let mut table = TableState::default();
        table.push_row(cells(&[("amount", "10.5")]));
        table.push_row(cells(&[("amount", "x")]));
        table.push_row(cells(&[("amount", "4.25")]));
        assert_eq!(table.column_total("amount"), "14.75");
    }

    #[test]
    fn remove_out_of_bounds_is_reported() {
        let mut table = TableState::default();
        assert!(matches!(
            table.remove_row_at(0),
            Err(FormError::IndexOutOfBounds { index: 0, len: 0, .. })
        ));
    }
}
