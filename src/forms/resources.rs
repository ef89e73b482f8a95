// src/forms/resources.rs
use bevy::prelude::*;
use std::collections::{BTreeMap, HashMap};

use super::definitions::FormSchema;
use super::error::{FormError, FormResult};
use super::state::FormState;
use super::submit::{LogSubmitHandler, SubmissionReceipt, SubmitHandler, SubmitOutcome};
use super::table::{editor_for, TableEditor};
use super::validation::{RuleSet, ValidationResult};

/// One mounted form: its schema, derived rules, live state and the most recent
/// validation result.
#[derive(Debug, Clone)]
pub struct FormSession {
    schema: FormSchema,
    rules: RuleSet,
    state: FormState,
    last_validation: Option<ValidationResult>,
    submissions: Vec<SubmissionReceipt>,
}

impl FormSession {
    pub fn new(schema: FormSchema) -> FormResult<Self> {
        schema.check()?;
        let rules = schema.ruleset()?;
        let state = FormState::from_schema(&schema);
        Ok(FormSession {
            schema,
            rules,
            state,
            last_validation: None,
            submissions: Vec::new(),
        })
    }

    /// Resumes editing a previously saved state of the same form. Sections the
    /// state lacks are created empty and every derived cell is recomputed from
    /// the loaded row values.
    pub fn with_state(schema: FormSchema, state: FormState) -> FormResult<Self> {
        if state.form_id != schema.form_id {
            return Err(FormError::InvalidSchema {
                form_id: schema.form_id.clone(),
                reason: format!("state belongs to form '{}'", state.form_id),
            });
        }
        let mut session = FormSession::new(schema)?;
        session.state = state;
        for section in &session.schema.sections {
            let table = session.state.sections.entry(section.key.clone()).or_default();
            TableEditor::new(section, table).recompute_all();
        }
        Ok(session)
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn last_validation(&self) -> Option<&ValidationResult> {
        self.last_validation.as_ref()
    }

    pub fn submissions(&self) -> &[SubmissionReceipt] {
        &self.submissions
    }

    pub fn table(&mut self, section: &str) -> FormResult<TableEditor<'_>> {
        editor_for(&self.schema, &mut self.state, section)
    }

    pub fn validate(&mut self) -> &ValidationResult {
        let result = self.rules.validate(&self.state);
        self.last_validation.insert(result)
    }

    /// Re-validates unconditionally, then hands the state to `handler` only if
    /// it is valid.
    pub fn submit(&mut self, handler: &dyn SubmitHandler) -> SubmitOutcome {
        let result = self.validate().clone();
        if !result.valid {
            info!(
                "Submit of '{}' withheld: {} validation error(s).",
                self.schema.form_id,
                result.errors.len()
            );
            return SubmitOutcome::Rejected(result);
        }
        match handler.submit(&self.schema, &self.state) {
            Ok(receipt) => {
                self.submissions.push(receipt.clone());
                SubmitOutcome::Accepted(receipt)
            }
            Err(e) => {
                error!("Submit handler failed for '{}': {}", self.schema.form_id, e);
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }
}

/// All known form schemas plus the sessions currently open, one per form id.
#[derive(Resource, Default, Debug)]
pub struct FormRegistry {
    schemas: BTreeMap<String, FormSchema>,
    sessions: HashMap<String, FormSession>,
}

impl FormRegistry {
    /// Registers a schema unless one with the same id exists. Returns whether it was added.
    pub fn register(&mut self, schema: FormSchema) -> FormResult<bool> {
        schema.check()?;
        schema.ruleset()?;
        if self.schemas.contains_key(&schema.form_id) {
            warn!(
                "Form '{}' already registered. Registration skipped.",
                schema.form_id
            );
            return Ok(false);
        }
        self.schemas.insert(schema.form_id.clone(), schema);
        Ok(true)
    }

    pub fn add_or_replace(&mut self, schema: FormSchema) -> FormResult<()> {
        schema.check()?;
        schema.ruleset()?;
        if self.schemas.insert(schema.form_id.clone(), schema).is_some() {
            debug!("Replaced existing form schema.");
        }
        Ok(())
    }

    pub fn schema(&self, form_id: &str) -> Option<&FormSchema> {
        self.schemas.get(form_id)
    }

    /// Schemas grouped by category (`None` first), each group sorted by id.
    pub fn by_category(&self) -> BTreeMap<Option<String>, Vec<&FormSchema>> {
        let mut grouped: BTreeMap<Option<String>, Vec<&FormSchema>> = BTreeMap::new();
        for schema in self.schemas.values() {
            grouped.entry(schema.category.clone()).or_default().push(schema);
        }
        grouped
    }

    /// Mounts a fresh instance of the form, replacing any open one.
    pub fn open(&mut self, form_id: &str) -> FormResult<&mut FormSession> {
        let schema = self
            .schemas
            .get(form_id)
            .cloned()
            .ok_or_else(|| FormError::FormNotFound(form_id.to_string()))?;
        let session = FormSession::new(schema)?;
        self.sessions.insert(form_id.to_string(), session);
        self.session_mut(form_id)
            .ok_or_else(|| FormError::FormNotFound(form_id.to_string()))
    }

    pub fn session(&self, form_id: &str) -> Option<&FormSession> {
        self.sessions.get(form_id)
    }

    pub fn session_mut(&mut self, form_id: &str) -> Option<&mut FormSession> {
        self.sessions.get_mut(form_id)
    }
}

/// The collaborator that receives validated forms.
#[derive(Resource)]
pub struct ActiveSubmitHandler(pub Box<dyn SubmitHandler>);

impl Default for ActiveSubmitHandler {
    fn default() -> Self {
        ActiveSubmitHandler(Box::new(LogSubmitHandler))
    }
}
