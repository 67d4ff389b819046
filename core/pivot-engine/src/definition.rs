//! FILENAME: core/pivot-engine/src/definition.rs
//! Aggregation requests - what a summary IS.
//!
//! These structures are plain, serializable descriptions of user intent.
//! Field names stay strings here; they are resolved against a record set's
//! schema only when the request is executed.

use serde::{Deserialize, Serialize};

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aggregator {
    /// Number of records in the group.
    Count,
    /// Sum of the value field over the group; absent values add zero.
    Sum,
}

impl Default for Aggregator {
    fn default() -> Self {
        Aggregator::Count
    }
}

impl Aggregator {
    pub fn label(self) -> &'static str {
        match self {
            Aggregator::Count => "Count",
            Aggregator::Sum => "Sum",
        }
    }
}

// ============================================================================
// PIVOT REQUEST
// ============================================================================

/// One cross-tabulation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSpec {
    /// Field whose values become the rows.
    pub row_field: String,

    /// Field whose values become the columns.
    pub col_field: String,

    /// Field summed by `Aggregator::Sum`. Ignored by `Count`.
    #[serde(default)]
    pub value_field: Option<String>,

    #[serde(default)]
    pub aggregator: Aggregator,
}

impl AggregationSpec {
    /// A record-count pivot.
    pub fn count(row_field: impl Into<String>, col_field: impl Into<String>) -> Self {
        AggregationSpec {
            row_field: row_field.into(),
            col_field: col_field.into(),
            value_field: None,
            aggregator: Aggregator::Count,
        }
    }

    /// A pivot summing `value_field`.
    pub fn sum(
        row_field: impl Into<String>,
        col_field: impl Into<String>,
        value_field: impl Into<String>,
    ) -> Self {
        AggregationSpec {
            row_field: row_field.into(),
            col_field: col_field.into(),
            value_field: Some(value_field.into()),
            aggregator: Aggregator::Sum,
        }
    }
}

// ============================================================================
// FLAT SUMMARY ORDERING
// ============================================================================

/// Ordering of a one-dimensional summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryOrder {
    /// By key: term-aware for the admit term, natural otherwise.
    ByKey,
    /// Largest value first; equal values keep key order.
    ByValueDescending,
}

impl Default for SummaryOrder {
    fn default() -> Self {
        SummaryOrder::ByKey
    }
}
