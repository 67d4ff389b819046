//! FILENAME: core/records/src/record.rs
//! PURPOSE: Typed enrollment records and table validation.
//! CONTEXT: `load_validated` is the boundary between the loader and the
//! engines. After it succeeds, every consumer works with `Record`s and a
//! `Schema` describing which columns the upload actually carried.

use serde::{Deserialize, Serialize};
use crate::cell::CellValue;
use crate::error::EngineError;
use crate::schema::{Field, Schema, REQUIRED_COLUMNS};
use crate::student::classify;
use crate::table::RawTable;

// ============================================================================
// FIELD ACCESS
// ============================================================================

/// A borrowed view of one field of one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Empty,
    Number(f64),
    Text(&'a str),
}

impl<'a> FieldValue<'a> {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    /// Numeric value, with `Empty` and text contributing zero.
    pub fn number_or_zero(&self) -> f64 {
        match self {
            FieldValue::Number(n) => *n,
            _ => 0.0,
        }
    }

    fn from_text(value: &'a Option<String>) -> Self {
        value.as_deref().map_or(FieldValue::Empty, FieldValue::Text)
    }

    fn from_number(value: Option<f64>) -> Self {
        value.map_or(FieldValue::Empty, FieldValue::Number)
    }
}

/// Anything the pivot engine can group: plain records, projected records.
pub trait FieldAccess {
    fn field_value(&self, field: Field) -> FieldValue<'_>;
}

// ============================================================================
// RECORD
// ============================================================================

/// One row of the enrollment export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The data row index in the source table (0-based, excluding header).
    pub source_row: u32,
    pub plan_code: Option<String>,
    pub plan_description: Option<String>,
    pub admit_term: Option<String>,
    pub visa_type: Option<String>,
    pub campus: Option<String>,
    pub enrolled_credits: Option<f64>,
    pub cumulative_credits: Option<f64>,
}

impl FieldAccess for Record {
    fn field_value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::PlanCode => FieldValue::from_text(&self.plan_code),
            Field::PlanDescription => FieldValue::from_text(&self.plan_description),
            Field::AdmitTerm => FieldValue::from_text(&self.admit_term),
            Field::VisaType => FieldValue::from_text(&self.visa_type),
            Field::Campus => FieldValue::from_text(&self.campus),
            Field::EnrolledCredits => FieldValue::from_number(self.enrolled_credits),
            Field::CumulativeCredits => FieldValue::from_number(self.cumulative_credits),
            Field::StudentType => FieldValue::Text(classify(self.visa_type.as_deref()).label()),
            Field::RealizedRevenue | Field::CreditsRemaining | Field::ProjectedRevenue => {
                FieldValue::Empty
            }
        }
    }
}

// ============================================================================
// DATASET
// ============================================================================

/// Validated records plus the schema of the table they came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub schema: Schema,
}

impl Dataset {
    pub fn new(records: Vec<Record>, schema: Schema) -> Self {
        Dataset { records, schema }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A dataset over a subset of records, sharing this schema.
    pub fn with_records(&self, records: Vec<Record>) -> Dataset {
        Dataset {
            records,
            schema: self.schema.clone(),
        }
    }
}

/// Column positions of the source fields present in a table.
struct ColumnMap {
    positions: Vec<(Field, usize)>,
}

impl ColumnMap {
    fn new(table: &RawTable) -> Self {
        let positions = Field::SOURCE
            .iter()
            .filter_map(|&field| table.column_index(field.name()).map(|idx| (field, idx)))
            .collect();
        ColumnMap { positions }
    }

    fn schema(&self) -> Schema {
        let mut schema = Schema::new(self.positions.iter().map(|(f, _)| *f));
        if schema.contains(Field::VisaType) {
            schema.insert(Field::StudentType);
        }
        schema
    }

    fn build_record(&self, table: &RawTable, row: usize) -> Record {
        let mut record = Record {
            source_row: row as u32,
            ..Record::default()
        };

        for &(field, col) in &self.positions {
            let cell = table.get(row, col);
            match field {
                Field::PlanCode => record.plan_code = cell.as_text(),
                Field::PlanDescription => record.plan_description = cell.as_text(),
                Field::AdmitTerm => record.admit_term = cell.as_text(),
                Field::VisaType => record.visa_type = cell.as_text(),
                Field::Campus => record.campus = cell.as_text(),
                Field::EnrolledCredits => record.enrolled_credits = credits(cell),
                Field::CumulativeCredits => record.cumulative_credits = credits(cell),
                _ => {}
            }
        }

        record
    }
}

/// Credit counts are non-negative; negative numbers read as absent.
fn credits(cell: &CellValue) -> Option<f64> {
    cell.as_number().filter(|n| *n >= 0.0)
}

/// Validates column presence and converts every data row to a `Record`.
pub fn load_validated(table: &RawTable) -> Result<Dataset, EngineError> {
    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !table.has_column(c)) {
        return Err(EngineError::MissingColumn(missing.to_string()));
    }

    let columns = ColumnMap::new(table);
    let records: Vec<Record> = (0..table.row_count())
        .map(|row| columns.build_record(table, row))
        .collect();
    let schema = columns.schema();

    log::debug!(
        "loaded {} records with fields [{}]",
        records.len(),
        schema
            .fields()
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(Dataset { records, schema })
}
