//! FILENAME: core/pivot-engine/src/view.rs
//! Summary results - what the shell renders.
//!
//! A `PivotResult` is a dense grid: every row key has a value for every
//! column key, with zero where no record fell into the intersection. Axis
//! order is fixed at calculation time and is part of the result.

use serde::{Deserialize, Serialize};
use records::Field;
use crate::cache::CacheValue;
use crate::definition::Aggregator;

// ============================================================================
// AXIS KEYS
// ============================================================================

/// One row or column key of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PivotKey {
    Number(f64),
    Text(String),
}

impl From<&CacheValue> for PivotKey {
    fn from(value: &CacheValue) -> Self {
        match value {
            CacheValue::Number(n) => PivotKey::Number(n.as_f64()),
            CacheValue::Text(s) => PivotKey::Text(s.clone()),
        }
    }
}

impl PivotKey {
    pub fn text(s: impl Into<String>) -> Self {
        PivotKey::Text(s.into())
    }

    /// Display label: integral numbers without a decimal part.
    pub fn label(&self) -> String {
        match self {
            PivotKey::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{:.0}", n),
            PivotKey::Number(n) => format!("{}", n),
            PivotKey::Text(s) => s.clone(),
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            PivotKey::Text(s) => s == label,
            PivotKey::Number(_) => self.label() == label,
        }
    }
}

impl std::fmt::Display for PivotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

// ============================================================================
// PIVOT RESULT
// ============================================================================

/// A cross-tabulation of one field against another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotResult {
    pub row_field: Field,
    pub col_field: Field,
    /// Summed field, `None` for counts.
    pub value_field: Option<Field>,
    pub aggregator: Aggregator,

    /// Row keys in display order.
    pub row_keys: Vec<PivotKey>,

    /// Column keys in display order.
    pub col_keys: Vec<PivotKey>,

    /// `values[r][c]` is the aggregate for `row_keys[r]` x `col_keys[c]`.
    pub values: Vec<Vec<f64>>,
}

impl PivotResult {
    pub fn is_empty(&self) -> bool {
        self.row_keys.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_keys.len()
    }

    /// Looks up a cell by row and column labels.
    pub fn get(&self, row_label: &str, col_label: &str) -> Option<f64> {
        let r = self.row_keys.iter().position(|k| k.matches(row_label))?;
        let c = self.col_keys.iter().position(|k| k.matches(col_label))?;
        Some(self.values[r][c])
    }

    /// Iterates rows as (key, values in column order).
    pub fn rows(&self) -> impl Iterator<Item = (&PivotKey, &[f64])> {
        self.row_keys
            .iter()
            .zip(self.values.iter().map(Vec::as_slice))
    }

    pub fn row_totals(&self) -> Vec<f64> {
        self.values.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn column_totals(&self) -> Vec<f64> {
        (0..self.col_keys.len())
            .map(|c| self.values.iter().map(|row| row[c]).sum())
            .collect()
    }

    pub fn grand_total(&self) -> f64 {
        self.values.iter().flatten().sum()
    }
}

// ============================================================================
// FLAT SUMMARY
// ============================================================================

/// One line of a flat summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub key: PivotKey,
    pub value: f64,
}

/// A one-dimensional group-by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatSummary {
    pub key_field: Field,
    pub value_field: Option<Field>,
    pub aggregator: Aggregator,
    pub entries: Vec<SummaryEntry>,
}

impl FlatSummary {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.key.matches(label))
            .map(|e| e.value)
    }

    /// Keys in summary order, as labels.
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key.label()).collect()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }
}
