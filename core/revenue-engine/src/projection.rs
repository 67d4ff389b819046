//! FILENAME: core/revenue-engine/src/projection.rs
//! PURPOSE: Per-record realized and projected revenue.
//! CONTEXT: Each input record is copied into a `ProjectedRecord` that carries
//! the computed figures; the caller's dataset is never modified.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use records::{
    Dataset, EngineError, Field, FieldAccess, FieldValue, PlanCostConfig, Record, Schema,
};

// ============================================================================
// WARNINGS
// ============================================================================

/// Non-fatal conditions raised while projecting.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionWarning {
    #[error("Projected revenue unavailable: column '{missing_column}' is missing")]
    UnavailableProjection { missing_column: String },
}

// ============================================================================
// PROJECTED RECORD
// ============================================================================

/// A record together with its revenue figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedRecord {
    pub record: Record,

    /// Enrolled credits times the plan's cost per credit.
    pub realized_revenue: f64,

    /// Credits still needed to finish the plan. `None` when cumulative
    /// credits are unavailable for the dataset.
    pub credits_remaining: Option<f64>,

    /// Remaining credits times the plan's cost per credit.
    pub projected_revenue: Option<f64>,
}

impl ProjectedRecord {
    /// Computes the figures for one record.
    /// `with_projection` is false when the dataset has no cumulative column.
    pub fn compute(record: &Record, costs: &PlanCostConfig, with_projection: bool) -> Self {
        let plan = costs.lookup(record.plan_description.as_deref());

        let realized_revenue = record.enrolled_credits.unwrap_or(0.0) * plan.cost_per_credit;

        let credits_remaining = with_projection.then(|| {
            let cumulative = record.cumulative_credits.unwrap_or(0.0);
            (plan.credits_required - cumulative).max(0.0)
        });
        let projected_revenue = credits_remaining.map(|credits| credits * plan.cost_per_credit);

        ProjectedRecord {
            record: record.clone(),
            realized_revenue,
            credits_remaining,
            projected_revenue,
        }
    }
}

impl FieldAccess for ProjectedRecord {
    fn field_value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::RealizedRevenue => FieldValue::Number(self.realized_revenue),
            Field::CreditsRemaining => {
                self.credits_remaining.map_or(FieldValue::Empty, FieldValue::Number)
            }
            Field::ProjectedRevenue => {
                self.projected_revenue.map_or(FieldValue::Empty, FieldValue::Number)
            }
            other => self.record.field_value(other),
        }
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

/// Output of `project`: augmented records, their schema, and any warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSet {
    pub records: Vec<ProjectedRecord>,
    pub schema: Schema,
    pub warnings: Vec<ProjectionWarning>,
}

impl ProjectionSet {
    /// True when projected figures were computed.
    pub fn projection_available(&self) -> bool {
        self.schema.contains(Field::ProjectedRevenue)
    }

    /// The warning explaining why projections are missing, if they are.
    pub fn unavailable_reason(&self) -> Option<&ProjectionWarning> {
        self.warnings
            .iter()
            .find(|w| matches!(w, ProjectionWarning::UnavailableProjection { .. }))
    }
}

/// Computes revenue figures for every record of `dataset`.
///
/// Fails with `MissingField` when the dataset has no enrolled-credits column.
/// A missing cumulative-credits column is not an error: the set is returned
/// without projected fields and with an `UnavailableProjection` warning.
pub fn project(dataset: &Dataset, costs: &PlanCostConfig) -> Result<ProjectionSet, EngineError> {
    if !dataset.schema.contains(Field::EnrolledCredits) {
        return Err(EngineError::MissingField(Field::EnrolledCredits.name().to_string()));
    }

    let with_projection = dataset.schema.contains(Field::CumulativeCredits);

    let mut schema = dataset.schema.clone();
    schema.insert(Field::RealizedRevenue);

    let mut warnings = Vec::new();
    if with_projection {
        schema.insert(Field::CreditsRemaining);
        schema.insert(Field::ProjectedRevenue);
    } else {
        let warning = ProjectionWarning::UnavailableProjection {
            missing_column: Field::CumulativeCredits.name().to_string(),
        };
        log::warn!("{}", warning);
        warnings.push(warning);
    }

    let unknown_plans = dataset
        .records
        .iter()
        .filter(|r| !r.plan_description.as_deref().is_some_and(|d| costs.is_known(d)))
        .count();
    if unknown_plans > 0 {
        log::debug!("{} record(s) priced with fallback plan costs", unknown_plans);
    }

    let records: Vec<ProjectedRecord> = dataset
        .records
        .iter()
        .map(|r| ProjectedRecord::compute(r, costs, with_projection))
        .collect();

    log::debug!(
        "projected revenue for {} records (projection available: {})",
        records.len(),
        with_projection
    );

    Ok(ProjectionSet {
        records,
        schema,
        warnings,
    })
}
