//! FILENAME: core/records/src/schema.rs
//! Field schema for enrollment record sets.
//!
//! Pivot requests name their dimensions by string. Those names are resolved
//! once, up front, against the `Schema` of the record set being aggregated,
//! so that a typo or a column missing from this particular upload fails with
//! `EngineError::FieldNotFound` before any grouping work starts.

use serde::{Deserialize, Serialize};
use crate::error::EngineError;

// ============================================================================
// COLUMN NAMES
// ============================================================================

pub const COL_PLAN_CODE: &str = "Academic Plan";
pub const COL_PLAN_DESCRIPTION: &str = "Academic Plan Description";
pub const COL_ADMIT_TERM: &str = "Admit Term";
pub const COL_VISA_TYPE: &str = "Visa Type";
pub const COL_CAMPUS: &str = "Campus";
pub const COL_ENROLLED_CREDITS: &str = "Enrolled Credits";
pub const COL_CUMULATIVE_CREDITS: &str = "STFACT_TOT_CUMULATIVE";

/// Columns that must exist for a table to load at all.
pub const REQUIRED_COLUMNS: [&str; 2] = [COL_PLAN_CODE, COL_PLAN_DESCRIPTION];

// ============================================================================
// FIELDS
// ============================================================================

/// Value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Number,
}

/// Every attribute a summary can be sliced or summed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    PlanCode,
    PlanDescription,
    AdmitTerm,
    VisaType,
    Campus,
    EnrolledCredits,
    CumulativeCredits,
    /// Derived from `VisaType`.
    StudentType,
    RealizedRevenue,
    CreditsRemaining,
    ProjectedRevenue,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::PlanCode,
        Field::PlanDescription,
        Field::AdmitTerm,
        Field::VisaType,
        Field::Campus,
        Field::EnrolledCredits,
        Field::CumulativeCredits,
        Field::StudentType,
        Field::RealizedRevenue,
        Field::CreditsRemaining,
        Field::ProjectedRevenue,
    ];

    /// Fields read straight from a table column.
    pub const SOURCE: [Field; 7] = [
        Field::PlanCode,
        Field::PlanDescription,
        Field::AdmitTerm,
        Field::VisaType,
        Field::Campus,
        Field::EnrolledCredits,
        Field::CumulativeCredits,
    ];

    /// Canonical display name (the source column header for source fields).
    pub fn name(self) -> &'static str {
        match self {
            Field::PlanCode => COL_PLAN_CODE,
            Field::PlanDescription => COL_PLAN_DESCRIPTION,
            Field::AdmitTerm => COL_ADMIT_TERM,
            Field::VisaType => COL_VISA_TYPE,
            Field::Campus => COL_CAMPUS,
            Field::EnrolledCredits => COL_ENROLLED_CREDITS,
            Field::CumulativeCredits => COL_CUMULATIVE_CREDITS,
            Field::StudentType => "Student Type",
            Field::RealizedRevenue => "Realized Revenue",
            Field::CreditsRemaining => "Credits Remaining",
            Field::ProjectedRevenue => "Projected Revenue",
        }
    }

    /// camelCase identifier accepted as an alias of `name()`.
    pub fn key(self) -> &'static str {
        match self {
            Field::PlanCode => "planCode",
            Field::PlanDescription => "planDescription",
            Field::AdmitTerm => "admitTerm",
            Field::VisaType => "visaType",
            Field::Campus => "campus",
            Field::EnrolledCredits => "enrolledCredits",
            Field::CumulativeCredits => "cumulativeCredits",
            Field::StudentType => "studentType",
            Field::RealizedRevenue => "realizedRevenue",
            Field::CreditsRemaining => "creditsRemaining",
            Field::ProjectedRevenue => "projectedRevenue",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::PlanCode
            | Field::PlanDescription
            | Field::AdmitTerm
            | Field::VisaType
            | Field::Campus
            | Field::StudentType => FieldKind::Text,
            Field::EnrolledCredits
            | Field::CumulativeCredits
            | Field::RealizedRevenue
            | Field::CreditsRemaining
            | Field::ProjectedRevenue => FieldKind::Number,
        }
    }

    /// Looks a field up by display name or camelCase key.
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Field> {
        let wanted = name.trim();
        Field::ALL.iter().copied().find(|f| {
            f.name().eq_ignore_ascii_case(wanted) || f.key().eq_ignore_ascii_case(wanted)
        })
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// The set of fields available on one record set, in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Self {
        let mut schema = Schema::default();
        for field in fields {
            schema.insert(field);
        }
        schema
    }

    /// Adds a field, keeping canonical order and ignoring duplicates.
    pub fn insert(&mut self, field: Field) {
        if let Err(pos) = self.fields.binary_search(&field) {
            self.fields.insert(pos, field);
        }
    }

    /// Returns a copy of this schema without `field`.
    pub fn without(&self, field: Field) -> Schema {
        Schema {
            fields: self.fields.iter().copied().filter(|f| *f != field).collect(),
        }
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.binary_search(&field).is_ok()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Resolves a caller-supplied field name against this schema.
    pub fn resolve(&self, name: &str) -> Result<Field, EngineError> {
        match Field::from_name(name) {
            Some(field) if self.contains(field) => Ok(field),
            _ => Err(EngineError::FieldNotFound(name.trim().to_string())),
        }
    }

    /// Resolves a field name and checks that it holds numbers.
    pub fn resolve_numeric(&self, name: &str) -> Result<Field, EngineError> {
        let field = self.resolve(name)?;
        match field.kind() {
            FieldKind::Number => Ok(field),
            FieldKind::Text => Err(EngineError::NotNumeric(field.name().to_string())),
        }
    }
}
