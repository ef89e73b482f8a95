// src/forms/table/editor.rs
//! Editing one repeatable section: dynamic columns, rows, cells and the derived
//! cells that follow from them.

use bevy::prelude::{debug, trace};

use super::column_key::derive_column_key;
use crate::forms::definitions::{derivation::recompute_row, FormSchema, SectionDefinition};
use crate::forms::error::{FormError, FormResult};
use crate::forms::state::path::{is_valid_segment_name, DYNAMIC_FIELDS};
use crate::forms::state::{CellKey, DynamicColumn, FormState, Row, RowId, TableState};

pub struct TableEditor<'a> {
    section: &'a SectionDefinition,
    table: &'a mut TableState,
}

/// Opens an editor on `section` of `state`.
pub fn editor_for<'a>(
    schema: &'a FormSchema,
    state: &'a mut FormState,
    section: &str,
) -> FormResult<TableEditor<'a>> {
    let definition = schema
        .section(section)
        .ok_or_else(|| FormError::invalid_path(section, "not a section of this form"))?;
    let table = state.table_mut(section)?;
    Ok(TableEditor::new(definition, table))
}

impl<'a> TableEditor<'a> {
    pub fn new(section: &'a SectionDefinition, table: &'a mut TableState) -> Self {
        TableEditor { section, table }
    }

    pub fn table(&self) -> &TableState {
        self.table
    }

    pub fn add_column(&mut self, label: &str) -> FormResult<DynamicColumn> {
        self.add_column_with_key(label, None)
    }

    /// Adds a dynamic column. The key comes from `key_override` when given,
    /// otherwise from `label`; both are normalized the same way before the
    /// uniqueness check. The key must stay addressable as
    /// `dynamicFields.<key>`. On error the table is left untouched.
    pub fn add_column_with_key(
        &mut self,
        label: &str,
        key_override: Option<&str>,
    ) -> FormResult<DynamicColumn> {
        if !self.section.allow_dynamic_columns {
            return Err(FormError::DynamicColumnsDisabled(self.section.key.clone()));
        }
        let key = derive_column_key(key_override.unwrap_or(label));
        if key.is_empty() {
            return Err(FormError::EmptyColumnKey {
                label: label.to_string(),
            });
        }
        if !is_valid_segment_name(&key) || key == DYNAMIC_FIELDS {
            return Err(FormError::InvalidColumnKey {
                label: label.to_string(),
                key,
            });
        }
        if self.table.has_column(&key) || self.section.has_base_field(&key) {
            return Err(FormError::DuplicateColumnKey {
                table: self.section.key.clone(),
                key,
            });
        }

        let trimmed = label.trim();
        let column = DynamicColumn {
            key: key.clone(),
            label: if trimmed.is_empty() { key.clone() } else { trimmed.to_string() },
        };
        self.table.columns.push(column.clone());
        for row in self.table.rows.iter_mut() {
            row.dynamic_fields.entry(key.clone()).or_default();
        }
        debug!(
            "Added dynamic column '{}' ({}) to '{}'.",
            column.label, column.key, self.section.key
        );
        Ok(column)
    }

    /// Drops the column and its value from every row. Returns false when no
    /// such column existed.
    pub fn remove_column(&mut self, key: &str) -> bool {
        let before = self.table.columns.len();
        self.table.columns.retain(|c| c.key != key);
        if self.table.columns.len() == before {
            trace!("remove_column: '{}' not present in '{}'.", key, self.section.key);
            return false;
        }
        for row in self.table.rows.iter_mut() {
            row.dynamic_fields.remove(key);
        }
        debug!("Removed dynamic column '{}' from '{}'.", key, self.section.key);
        true
    }

    /// Appends a row from the section template, one empty value per dynamic column.
    pub fn add_row(&mut self) -> RowId {
        self.table.push_row(self.section.row_template())
    }

    pub fn remove_row(&mut self, index: usize) -> FormResult<Row> {
        self.table.remove_row_at(index).map_err(|e| match e {
            FormError::IndexOutOfBounds { index, len, .. } => FormError::IndexOutOfBounds {
                target: self.section.key.clone(),
                index,
                len,
            },
            other => other,
        })
    }

    pub fn remove_row_by_id(&mut self, id: RowId) -> FormResult<Row> {
        let index = self.index_of(id)?;
        self.remove_row(index)
    }

    /// Sets one cell. `field` is a base column key or `dynamicFields.<key>`.
    pub fn edit_cell(&mut self, row_index: usize, field: &str, value: &str) -> FormResult<()> {
        let id = self
            .table
            .row_id_at(row_index)
            .ok_or_else(|| FormError::IndexOutOfBounds {
                target: self.section.key.clone(),
                index: row_index,
                len: self.table.len(),
            })?;
        let cell = self.parse_cell(field)?;
        self.edit_cell_by_id(id, &cell, value)
    }

    pub fn edit_cell_by_id(&mut self, id: RowId, cell: &CellKey, value: &str) -> FormResult<()> {
        self.check_cell(cell)?;
        let section = self.section;
        let row = self.table.row_mut(id).ok_or_else(|| FormError::RowNotFound {
            table: section.key.clone(),
            row_id: id.0,
        })?;
        row.set(cell, value.to_string());
        if let CellKey::Base(key) = cell {
            if section.feeds_derivation(key) {
                recompute_row(&section.derivations, &mut row.cells);
            }
        }
        Ok(())
    }

    /// Recomputes derived cells of every row from current values.
    pub fn recompute_all(&mut self) {
        if self.section.derivations.is_empty() {
            return;
        }
        for row in self.table.rows.iter_mut() {
            recompute_row(&self.section.derivations, &mut row.cells);
        }
    }

    pub fn index_of(&self, id: RowId) -> FormResult<usize> {
        self.table.index_of(id).ok_or_else(|| FormError::RowNotFound {
            table: self.section.key.clone(),
            row_id: id.0,
        })
    }

    fn parse_cell(&self, field: &str) -> FormResult<CellKey> {
        CellKey::parse(field).ok_or_else(|| {
            FormError::invalid_path(
                format!("{}[].{}", self.section.key, field),
                "expected a column key or dynamicFields.<key>",
            )
        })
    }

    fn check_cell(&self, cell: &CellKey) -> FormResult<()> {
        let known = match cell {
            CellKey::Base(k) => self.section.has_base_field(k),
            CellKey::Dynamic(k) => self.table.has_column(k),
        };
        if known {
            Ok(())
        } else {
            Err(FormError::invalid_path(
                format!("{}[].{}", self.section.key, cell.key()),
                "no such column",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::definitions::{Derivation, FieldDataType, FieldDefinition, Formula};

    fn items_section() -> SectionDefinition {
        SectionDefinition::new(
            "items",
            "Items",
            vec![
                FieldDefinition::new("description", "Description", FieldDataType::Text),
                FieldDefinition::new("remarks", "Remarks", FieldDataType::Text),
            ],
        )
    }

    fn cash_flow_section() -> SectionDefinition {
        SectionDefinition::new(
            "accounts",
            "Accounts",
            vec![
                FieldDefinition::new("openingBalance", "Opening", FieldDataType::Number),
                FieldDefinition::new("cashInflows", "Inflows", FieldDataType::Number),
                FieldDefinition::new("cashOutflows", "Outflows", FieldDataType::Number),
                FieldDefinition::new("netMovement", "Net", FieldDataType::Number).read_only(),
                FieldDefinition::new("closingBalance", "Closing", FieldDataType::Number).read_only(),
            ],
        )
        .with_derivation(Derivation::new(
            "netMovement",
            Formula::Difference {
                minuend: "cashInflows".into(),
                subtrahend: "cashOutflows".into(),
            },
        ))
        .with_derivation(Derivation::new(
            "closingBalance",
            Formula::Sum {
                terms: vec!["openingBalance".into(), "netMovement".into()],
            },
        ))
    }

    #[test]
    fn add_column_backfills_every_row() {
        let section = items_section();
        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        editor.add_row();
        editor.add_row();

        let column = editor.add_column("Cost Center").unwrap();
        assert_eq!(column.key, "CostCenter");
        assert_eq!(column.label, "Cost Center");
        for row in &editor.table().rows {
            assert_eq!(row.dynamic_fields.get("CostCenter").map(String::as_str), Some(""));
        }

        let id = editor.add_row();
        let new_row = editor.table().row(id).unwrap();
        assert!(new_row.dynamic_fields.contains_key("CostCenter"));
    }

    #[test]
    fn duplicate_keys_after_normalization_are_rejected() {
        let section = items_section();
        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        editor.add_row();
        editor.add_column("Cost Center").unwrap();
        let snapshot = editor.table().clone();

        for label in ["Cost  Center", "CostCenter", " Cost Center "] {
            let err = editor.add_column(label).unwrap_err();
            assert_eq!(
                err,
                FormError::DuplicateColumnKey {
                    table: "items".into(),
                    key: "CostCenter".into()
                }
            );
        }
        assert_eq!(editor.table(), &snapshot);
    }

    #[test]
    fn base_field_keys_cannot_be_shadowed() {
        let section = items_section();
        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        assert!(matches!(
            editor.add_column("remarks"),
            Err(FormError::DuplicateColumnKey { .. })
        ));
        assert!(matches!(
            editor.add_column("  "),
            Err(FormError::EmptyColumnKey { .. })
        ));
    }

    #[test]
    fn key_override_goes_through_same_check() {
        let section = items_section();
        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        let column = editor.add_column_with_key("Cost Center (HQ)", Some("cc")).unwrap();
        assert_eq!(column.key, "cc");
        assert!(editor.add_column_with_key("Other", Some(" c c ")).is_err());
    }

    #[test]
    fn labels_with_path_punctuation_are_rejected() {
        let section = items_section();
        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        editor.add_row();
        let snapshot = editor.table().clone();

        let err = editor.add_column("Ref. No.").unwrap_err();
        assert_eq!(
            err,
            FormError::InvalidColumnKey {
                label: "Ref. No.".into(),
                key: "Ref.No.".into()
            }
        );
        assert!(!err.is_programmer_error());
        assert!(matches!(
            editor.add_column("Weight [kg]"),
            Err(FormError::InvalidColumnKey { ref key, .. }) if key == "Weight[kg]"
        ));
        assert!(matches!(
            editor.add_column_with_key("Weight", Some("w.kg")),
            Err(FormError::InvalidColumnKey { .. })
        ));
        assert!(matches!(
            editor.add_column("dynamic Fields"),
            Err(FormError::InvalidColumnKey { .. })
        ));
        assert_eq!(editor.table(), &snapshot);

        let column = editor.add_column("Ref No").unwrap();
        editor
            .edit_cell(0, &format!("dynamicFields.{}", column.key), "R-7")
            .unwrap();
        assert_eq!(editor.table().rows[0].dynamic_fields["RefNo"], "R-7");
    }

    #[test]
    fn add_then_remove_column_restores_shape() {
        let section = items_section();
        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        editor.add_row();
        editor.add_column("Project").unwrap();
        editor.edit_cell(0, "dynamicFields.Project", "P-1").unwrap();
        let before = editor.table().clone();

        editor.add_column("Cost Center").unwrap();
        editor.edit_cell(0, "dynamicFields.CostCenter", "CC-9").unwrap();
        assert!(editor.remove_column("CostCenter"));

        assert_eq!(editor.table().columns, before.columns);
        assert_eq!(editor.table().rows, before.rows);
        assert!(!editor.remove_column("CostCenter"));
    }

    #[test]
    fn cell_edits_round_trip() {
        let section = items_section();
        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        editor.add_row();
        editor.add_column("Bin").unwrap();
        editor.edit_cell(0, "remarks", "ok").unwrap();
        editor.edit_cell(0, "dynamicFields.Bin", "B4").unwrap();
        let row = &editor.table().rows[0];
        assert_eq!(row.cells["remarks"], "ok");
        assert_eq!(row.dynamic_fields["Bin"], "B4");

        assert!(editor.edit_cell(0, "unknown", "x").is_err());
        assert!(editor.edit_cell(0, "dynamicFields.Missing", "x").is_err());
        assert!(matches!(
            editor.edit_cell(3, "remarks", "x"),
            Err(FormError::IndexOutOfBounds { index: 3, .. })
        ));
    }

    #[test]
    fn derived_cells_are_recomputed_from_scratch() {
        let section = cash_flow_section();
        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        editor.add_row();
        editor.edit_cell(0, "openingBalance", "100").unwrap();
        editor.edit_cell(0, "cashInflows", "50").unwrap();
        editor.edit_cell(0, "cashOutflows", "30").unwrap();
        let row = &editor.table().rows[0];
        assert_eq!(row.cells["netMovement"], "20.00");
        assert_eq!(row.cells["closingBalance"], "120.00");

        editor.edit_cell(0, "cashInflows", "80").unwrap();
        let row = &editor.table().rows[0];
        assert_eq!(row.cells["netMovement"], "50.00");
        assert_eq!(row.cells["closingBalance"], "150.00");
    }

    #[test]
    fn only_derivation_cells_trigger_recompute() {
        let mut section = cash_flow_section();
        section
            .fields
            .push(FieldDefinition::new("memo", "Memo", FieldDataType::Text));
        assert!(section.feeds_derivation("cashInflows"));
        assert!(section.feeds_derivation("closingBalance"));
        assert!(!section.feeds_derivation("memo"));

        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        editor.add_row();
        editor.edit_cell(0, "openingBalance", "10").unwrap();
        editor.edit_cell(0, "closingBalance", "999").unwrap();
        assert_eq!(editor.table().rows[0].cells["closingBalance"], "10.00");

        editor.edit_cell(0, "memo", "note").unwrap();
        assert_eq!(editor.table().rows[0].cells["memo"], "note");
        assert_eq!(editor.table().rows[0].cells["closingBalance"], "10.00");
    }

    #[test]
    fn new_rows_start_with_derived_zeroes() {
        let section = cash_flow_section();
        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        let id = editor.add_row();
        assert_eq!(editor.table().row(id).unwrap().cells["closingBalance"], "0.00");
    }

    #[test]
    fn rows_are_addressable_by_id_after_removal() {
        let section = items_section();
        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        let first = editor.add_row();
        let second = editor.add_row();
        let third = editor.add_row();
        editor
            .edit_cell_by_id(third, &CellKey::Base("remarks".into()), "last")
            .unwrap();

        editor.remove_row_by_id(second).unwrap();

        assert_eq!(editor.index_of(first).unwrap(), 0);
        assert_eq!(editor.index_of(third).unwrap(), 1);
        assert_eq!(editor.table().rows[1].cells["remarks"], "last");
        assert!(matches!(
            editor.remove_row_by_id(second),
            Err(FormError::RowNotFound { .. })
        ));
    }

    #[test]
    fn locked_sections_refuse_columns() {
        let mut section = items_section();
        section.allow_dynamic_columns = false;
        let mut table = TableState::default();
        let mut editor = TableEditor::new(&section, &mut table);
        assert_eq!(
            editor.add_column("Extra"),
            Err(FormError::DynamicColumnsDisabled("items".into()))
        );
    }
}
