// src/forms/validation/rule_set.rs
use crate::forms::definitions::{FieldRule, FormSchema};
use crate::forms::error::{FormError, FormResult};
use crate::forms::state::FieldPath;

#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub path: FieldPath,
    pub rule: FieldRule,
    /// Shown in error messages.
    pub label: String,
}

/// Declarative checks evaluated against a `FormState`. Entries are checked for
/// shape when added, so evaluation itself cannot fail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    entries: Vec<RuleEntry>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, path: &str, rule: FieldRule, label: &str) -> FormResult<()> {
        let parsed = FieldPath::parse(path).map_err(|e| FormError::MalformedRule {
            path: path.to_string(),
            rule: rule.to_string(),
            reason: e.to_string(),
        })?;
        if rule.applies_to_section() && !matches!(parsed, FieldPath::Field(_)) {
            return Err(FormError::MalformedRule {
                path: path.to_string(),
                rule: rule.to_string(),
                reason: "row counts apply to a whole section".to_string(),
            });
        }
        self.entries.push(RuleEntry {
            path: parsed,
            rule,
            label: label.to_string(),
        });
        Ok(())
    }

    /// Rules declared by a schema: field rules, implied type rules, section
    /// minimums and per-column rules applied to every row.
    pub fn from_schema(schema: &FormSchema) -> FormResult<Self> {
        let mut rules = RuleSet::new();
        for field in &schema.fields {
            for rule in field.effective_rules() {
                if rule.applies_to_section() {
                    return Err(FormError::MalformedRule {
                        path: field.key.clone(),
                        rule: rule.to_string(),
                        reason: "declared on a scalar field".to_string(),
                    });
                }
                rules.add(&field.key, rule, &field.label)?;
            }
        }
        for section in &schema.sections {
            if section.min_items > 0 {
                rules.add(&section.key, FieldRule::MinItems(section.min_items), &section.label)?;
            }
            for field in &section.fields {
                if field.read_only {
                    continue;
                }
                for rule in field.effective_rules() {
                    if rule.applies_to_section() {
                        return Err(FormError::MalformedRule {
                            path: format!("{}[*].{}", section.key, field.key),
                            rule: rule.to_string(),
                            reason: "declared on a column".to_string(),
                        });
                    }
                    rules.add(
                        &format!("{}[*].{}", section.key, field.key),
                        rule,
                        &field.label,
                    )?;
                }
            }
        }
        Ok(rules)
    }
}

impl FormSchema {
    pub fn ruleset(&self) -> FormResult<RuleSet> {
        RuleSet::from_schema(self)
    }
}
