// src/forms/definitions/derivation.rs
//! Read-only cells computed from sibling cells of the same row.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Formula {
    /// `minuend - subtrahend`
    Difference { minuend: String, subtrahend: String },
    /// Sum of all terms.
    Sum { terms: Vec<String> },
    /// Product of all factors.
    Product { factors: Vec<String> },
    /// `(high - base) / base * 100`, `0.00` when base is zero.
    VariancePercent { base: String, high: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Derivation {
    pub target: String,
    pub formula: Formula,
}

impl Formula {
    /// Cell keys read by this formula.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Formula::Difference {
                minuend,
                subtrahend,
            } => vec![minuend.as_str(), subtrahend.as_str()],
            Formula::Sum { terms } => terms.iter().map(String::as_str).collect(),
            Formula::Product { factors } => factors.iter().map(String::as_str).collect(),
            Formula::VariancePercent { base, high } => vec![base.as_str(), high.as_str()],
        }
    }

    pub fn evaluate(&self, cells: &BTreeMap<String, String>) -> f64 {
        let num = |key: &str| parse_amount(cells.get(key).map(String::as_str).unwrap_or(""));
        match self {
            Formula::Difference {
                minuend,
                subtrahend,
            } => num(minuend) - num(subtrahend),
            Formula::Sum { terms } => terms.iter().map(|t| num(t)).sum(),
            Formula::Product { factors } => factors.iter().map(|f| num(f)).product(),
            Formula::VariancePercent { base, high } => {
                let base = num(base);
                if base == 0.0 {
                    0.0
                } else {
                    (num(high) - base) / base * 100.0
                }
            }
        }
    }
}

impl Derivation {
    pub fn new(target: &str, formula: Formula) -> Self {
        Derivation {
            target: target.to_string(),
            formula,
        }
    }

    /// Writes the formatted result into the target cell.
    pub fn apply(&self, cells: &mut BTreeMap<String, String>) {
        let value = self.formula.evaluate(cells);
        cells.insert(self.target.clone(), format_amount(value));
    }
}

/// Lenient number parse used for arithmetic; anything unparsable counts as zero.
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.2}", value);
    if rounded == "-0.00" {
        "0.00".to_string()
    } else {
        rounded
    }
}

/// Re-runs every derivation of a row from its current cell values, in order,
/// so a later derivation can read an earlier one's target.
pub fn recompute_row(derivations: &[Derivation], cells: &mut BTreeMap<String, String>) {
    for derivation in derivations {
        derivation.apply(cells);
    }
}
