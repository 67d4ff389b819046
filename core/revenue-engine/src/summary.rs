//! FILENAME: core/revenue-engine/src/summary.rs
//! Revenue summaries over a `ProjectionSet`.
//!
//! Realized figures always compute. Projected figures come back wrapped in
//! `Projected`, which is `Unavailable` (carrying the warning) when the
//! upload had no cumulative-credits column, so a missing projection is never
//! rendered as a column of zeros.

use serde::{Deserialize, Serialize};
use pivot_engine::{
    aggregate, summarize, AggregationSpec, Aggregator, FlatSummary, PivotResult, SummaryOrder,
};
use records::{EngineError, Field};
use crate::projection::{ProjectionSet, ProjectionWarning};

/// A projected figure, or the reason it could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Projected<T> {
    Available(T),
    Unavailable(ProjectionWarning),
}

impl<T> Projected<T> {
    pub fn available(&self) -> Option<&T> {
        match self {
            Projected::Available(value) => Some(value),
            Projected::Unavailable(_) => None,
        }
    }

    pub fn into_available(self) -> Option<T> {
        match self {
            Projected::Available(value) => Some(value),
            Projected::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Projected::Available(_))
    }
}

/// Dataset-wide revenue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenueTotals {
    pub realized: f64,
    /// `None` when projections are unavailable.
    pub projected: Option<f64>,
}

impl ProjectionSet {
    /// Runs any aggregation over the projected records.
    pub fn aggregate(&self, spec: &AggregationSpec) -> Result<PivotResult, EngineError> {
        aggregate(&self.records, &self.schema, spec)
    }

    /// Sum of realized revenue by `row_field` x `col_field`.
    pub fn realized_pivot(&self, row_field: &str, col_field: &str) -> Result<PivotResult, EngineError> {
        self.aggregate(&AggregationSpec::sum(row_field, col_field, Field::RealizedRevenue.name()))
    }

    /// Sum of projected revenue by `row_field` x `col_field`.
    pub fn projected_pivot(
        &self,
        row_field: &str,
        col_field: &str,
    ) -> Result<Projected<PivotResult>, EngineError> {
        self.when_projected(|set| {
            set.aggregate(&AggregationSpec::sum(row_field, col_field, Field::ProjectedRevenue.name()))
        })
    }

    /// Realized revenue grouped by one field, in key order.
    pub fn realized_summary(&self, key_field: &str) -> Result<FlatSummary, EngineError> {
        self.sum_by(key_field, Field::RealizedRevenue)
    }

    /// Projected revenue grouped by one field, in key order.
    pub fn projected_summary(&self, key_field: &str) -> Result<Projected<FlatSummary>, EngineError> {
        self.when_projected(|set| set.sum_by(key_field, Field::ProjectedRevenue))
    }

    pub fn totals(&self) -> RevenueTotals {
        let realized = self.records.iter().map(|r| r.realized_revenue).sum();
        let projected = self.projection_available().then(|| {
            self.records
                .iter()
                .filter_map(|r| r.projected_revenue)
                .sum()
        });
        RevenueTotals { realized, projected }
    }

    fn sum_by(&self, key_field: &str, value: Field) -> Result<FlatSummary, EngineError> {
        summarize(
            &self.records,
            &self.schema,
            key_field,
            Some(value.name()),
            Aggregator::Sum,
            SummaryOrder::ByKey,
        )
    }

    fn when_projected<T>(
        &self,
        compute: impl FnOnce(&Self) -> Result<T, EngineError>,
    ) -> Result<Projected<T>, EngineError> {
        match self.unavailable_reason() {
            Some(warning) => Ok(Projected::Unavailable(warning.clone())),
            None => compute(self).map(Projected::Available),
        }
    }
}
