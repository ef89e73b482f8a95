// src/forms/state/form_state.rs
use bevy::prelude::trace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::appendix::{AttachmentRef, CustomField};
use super::path::{CellKey, FieldPath, RowSelector};
use super::signoff::SignoffBlock;
use super::table_state::{Row, RowId, TableState};
use crate::forms::definitions::FormSchema;
use crate::forms::error::{FormError, FormResult};

const CUSTOM_FIELDS: &str = "customFields";
const SIGNOFFS: &str = "signoffs";

/// The complete value tree of one form instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub form_id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default)]
    pub sections: BTreeMap<String, TableState>,
    #[serde(default)]
    pub signoffs: SignoffBlock,
    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl FormState {
    /// Fresh state for a newly opened form: defaults, template rows and the
    /// schema's signoff roles.
    pub fn from_schema(schema: &FormSchema) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|f| (f.key.clone(), f.default.clone()))
            .collect();
        let sections = schema
            .sections
            .iter()
            .map(|s| {
                let mut table = TableState::default();
                for _ in 0..s.default_rows {
                    table.push_row(s.row_template());
                }
                (s.key.clone(), table)
            })
            .collect();
        FormState {
            form_id: schema.form_id.clone(),
            fields,
            sections,
            signoffs: SignoffBlock::with_roles(&schema.signoff_roles),
            attachments: Vec::new(),
            custom_fields: Vec::new(),
        }
    }

    /// Current value at `path`, or an empty string when unset or unresolvable.
    pub fn get(&self, path: &str) -> String {
        match FieldPath::parse(path) {
            Ok(parsed) => self.get_path(&parsed).unwrap_or_default(),
            Err(e) => {
                trace!("FormState::get falling back to default: {}", e);
                String::new()
            }
        }
    }

    pub fn get_path(&self, path: &FieldPath) -> Option<String> {
        match path {
            FieldPath::Field(name) => self.fields.get(name).cloned(),
            FieldPath::Cell {
                section,
                row: RowSelector::Index(index),
                cell,
            } => match section.as_str() {
                CUSTOM_FIELDS => {
                    let field = self.custom_fields.get(*index)?;
                    match cell {
                        CellKey::Base(k) if k == "label" => Some(field.label.clone()),
                        CellKey::Base(k) if k == "value" => Some(field.value.clone()),
                        _ => None,
                    }
                }
                SIGNOFFS => match cell {
                    CellKey::Base(k) if k == "roleName" => {
                        self.signoffs.role(*index).map(|r| r.role_name.clone())
                    }
                    _ => None,
                },
                _ => self
                    .sections
                    .get(section)?
                    .rows
                    .get(*index)?
                    .get(cell)
                    .map(str::to_string),
            },
            FieldPath::Cell {
                row: RowSelector::Each,
                ..
            } => None,
        }
    }

    /// Replaces the value at `path`, creating the field or cell entry if needed.
    ///
    /// # Panics
    /// When the path does not resolve to a settable location. Use [`FormState::try_set`]
    /// to get the error instead.
    pub fn set(&mut self, path: &str, value: &str) {
        if let Err(e) = self.try_set(path, value) {
            panic!("FormState::set: {}", e);
        }
    }

    pub fn try_set(&mut self, path: &str, value: &str) -> FormResult<()> {
        let parsed = FieldPath::parse(path)?;
        self.set_path(&parsed, value.to_string())
    }

    pub fn set_path(&mut self, path: &FieldPath, value: String) -> FormResult<()> {
        let fail = |reason: &str| Err(FormError::invalid_path(path.to_string(), reason));
        match path {
            FieldPath::Field(name) => {
                if self.sections.contains_key(name) {
                    return fail("is a repeatable section, not a field");
                }
                if name == CUSTOM_FIELDS || name == SIGNOFFS || name == "attachments" {
                    return fail("is a reserved list");
                }
                self.fields.insert(name.clone(), value);
                Ok(())
            }
            FieldPath::Cell {
                row: RowSelector::Each,
                ..
            } => fail("wildcard paths cannot be written"),
            FieldPath::Cell {
                section,
                row: RowSelector::Index(index),
                cell,
            } => match section.as_str() {
                CUSTOM_FIELDS => {
                    let Some(field) = self.custom_fields.get_mut(*index) else {
                        return fail("custom field index out of range");
                    };
                    match cell {
                        CellKey::Base(k) if k == "label" => field.label = value,
                        CellKey::Base(k) if k == "value" => field.value = value,
                        _ => return fail("custom fields only have 'label' and 'value'"),
                    }
                    Ok(())
                }
                SIGNOFFS => match cell {
                    CellKey::Base(k) if k == "roleName" => self
                        .signoffs
                        .rename_role(*index, &value)
                        .or_else(|_| fail("signoff index out of range")),
                    _ => fail("only 'roleName' is addressable on signoffs"),
                },
                _ => {
                    let row = self.row_at_mut(section, *index, path)?;
                    row.set(cell, value);
                    Ok(())
                }
            },
        }
    }

    /// Appends a copy of `template` to the section.
    ///
    /// # Panics
    /// When `section` is not a repeatable section of this form.
    pub fn append_row(&mut self, section: &str, template: BTreeMap<String, String>) -> RowId {
        self.try_append_row(section, template)
            .unwrap_or_else(|e| panic!("FormState::append_row: {}", e))
    }

    pub fn try_append_row(
        &mut self,
        section: &str,
        template: BTreeMap<String, String>,
    ) -> FormResult<RowId> {
        Ok(self.table_mut(section)?.push_row(template))
    }

    /// Removes the row at `index`; later rows shift down by one.
    ///
    /// # Panics
    /// When `section` is not a repeatable section or `index` is out of range.
    pub fn remove_row(&mut self, section: &str, index: usize) -> Row {
        self.try_remove_row(section, index)
            .unwrap_or_else(|e| panic!("FormState::remove_row: {}", e))
    }

    pub fn try_remove_row(&mut self, section: &str, index: usize) -> FormResult<Row> {
        self.table_mut(section)?
            .remove_row_at(index)
            .map_err(|_| FormError::invalid_path(format!("{}[{}]", section, index), "no such row"))
    }

    pub fn table(&self, section: &str) -> Option<&TableState> {
        self.sections.get(section)
    }

    pub fn table_mut(&mut self, section: &str) -> FormResult<&mut TableState> {
        self.sections
            .get_mut(section)
            .ok_or_else(|| FormError::invalid_path(section, "not a repeatable section"))
    }

    /// Number of rows in a section; unknown sections count as empty.
    pub fn section_len(&self, section: &str) -> usize {
        self.sections.get(section).map_or(0, TableState::len)
    }

    pub fn add_attachment(&mut self, attachment: AttachmentRef) {
        self.attachments.push(attachment);
    }

    pub fn remove_attachment(&mut self, index: usize) -> FormResult<AttachmentRef> {
        if index >= self.attachments.len() {
            return Err(FormError::IndexOutOfBounds {
                target: "attachments".to_string(),
                index,
                len: self.attachments.len(),
            });
        }
        Ok(self.attachments.remove(index))
    }

    pub fn add_custom_field(&mut self, label: &str, value: &str) {
        self.custom_fields.push(CustomField {
            label: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn remove_custom_field(&mut self, index: usize) -> FormResult<CustomField> {
        if index >= self.custom_fields.len() {
            return Err(FormError::IndexOutOfBounds {
                target: CUSTOM_FIELDS.to_string(),
                index,
                len: self.custom_fields.len(),
            });
        }
        Ok(self.custom_fields.remove(index))
    }

    /// Every readable value as `(path, value)`, for read-only rendering.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (section, table) in &self.sections {
            for (i, row) in table.rows.iter().enumerate() {
                for (k, v) in &row.cells {
                    out.push((FieldPath::cell(section, i, k).to_string(), v.clone()));
                }
                for column in &table.columns {
                    let v = row.dynamic_fields.get(&column.key).cloned().unwrap_or_default();
                    out.push((
                        FieldPath::dynamic_cell(section, i, &column.key).to_string(),
                        v,
                    ));
                }
            }
        }
        for (i, field) in self.custom_fields.iter().enumerate() {
            out.push((format!("{}[{}].label", CUSTOM_FIELDS, i), field.label.clone()));
            out.push((format!("{}[{}].value", CUSTOM_FIELDS, i), field.value.clone()));
        }
        for (i, role) in self.signoffs.roles.iter().enumerate() {
            out.push((format!("{}[{}].roleName", SIGNOFFS, i), role.role_name.clone()));
        }
        out
    }

    fn row_at_mut(&mut self, section: &str, index: usize, path: &FieldPath) -> FormResult<&mut Row> {
        if self.fields.contains_key(section) {
            return Err(FormError::invalid_path(
                path.to_string(),
                "is a scalar field, not a section",
            ));
        }
        let table = self
            .sections
            .get_mut(section)
            .ok_or_else(|| FormError::invalid_path(path.to_string(), "not a repeatable section"))?;
        let len = table.rows.len();
        table.rows.get_mut(index).ok_or_else(|| {
            FormError::invalid_path(
                path.to_string(),
                format!("row {} out of range ({} rows)", index, len),
            )
        })
    }
}
