//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - The calculation core that turns records into summaries.
//!
//! Algorithm:
//! 1. Resolve the requested field names against the record set's schema
//! 2. Single pass over the records: intern axis values, skip records with an
//!    empty axis value, accumulate per group key
//! 3. Sort each axis once over its distinct values
//! 4. Emit a dense grid (pivot) or an ordered list (flat summary), filling
//!    intersections no record reached with zero

use rustc_hash::FxHashMap;
use records::{EngineError, Field, FieldAccess, Schema};
use crate::cache::{AggregateAccumulator, AxisCache, CacheValue, GroupKey, ValueId};
use crate::definition::{AggregationSpec, Aggregator, SummaryOrder};
use crate::view::{FlatSummary, PivotKey, PivotResult, SummaryEntry};

// ============================================================================
// RESOLUTION
// ============================================================================

/// Resolves the value field for an aggregator.
/// `Count` ignores any value field; `Sum` requires a numeric one.
fn resolve_value_field(
    schema: &Schema,
    value_field: Option<&str>,
    aggregator: Aggregator,
) -> Result<Option<Field>, EngineError> {
    match aggregator {
        Aggregator::Count => Ok(None),
        Aggregator::Sum => {
            let name = value_field.ok_or(EngineError::MissingValueField)?;
            schema.resolve_numeric(name).map(Some)
        }
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// Groups records over one or more axes.
struct Grouping {
    axes: Vec<AxisCache>,
    aggregates: FxHashMap<GroupKey, AggregateAccumulator>,
    included: usize,
}

impl Grouping {
    fn run<R: FieldAccess>(records: &[R], axis_fields: &[Field], value_field: Option<Field>) -> Self {
        let mut axes: Vec<AxisCache> = axis_fields.iter().map(|&f| AxisCache::new(f)).collect();
        let mut aggregates: FxHashMap<GroupKey, AggregateAccumulator> = FxHashMap::default();
        let mut included = 0usize;
        let mut ids: Vec<ValueId> = Vec::with_capacity(axes.len());

        for record in records {
            // Intern only once every axis has a value, so a skipped record
            // never contributes a key.
            let values: Option<Vec<CacheValue>> = axes
                .iter()
                .map(|axis| CacheValue::from_field(record.field_value(axis.field)))
                .collect();
            let Some(values) = values else {
                continue;
            };

            ids.clear();
            for (axis, value) in axes.iter_mut().zip(values) {
                ids.push(axis.intern(value));
            }

            let value = value_field.map(|f| record.field_value(f).number_or_zero());
            aggregates.entry(GroupKey::new(&ids)).or_default().add(value);
            included += 1;
        }

        Grouping {
            axes,
            aggregates,
            included,
        }
    }

    fn value_at(&self, ids: &[ValueId], aggregator: Aggregator) -> f64 {
        self.aggregates
            .get(&GroupKey::new(ids))
            .map_or(0.0, |acc| acc.compute(aggregator))
    }

    fn axis_keys(&self, axis: usize, sorted: &[ValueId]) -> Vec<PivotKey> {
        sorted
            .iter()
            .filter_map(|&id| self.axes[axis].get_value(id))
            .map(PivotKey::from)
            .collect()
    }
}

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

/// The main calculation engine for cross-tabulations.
pub struct PivotCalculator<'a, R: FieldAccess> {
    records: &'a [R],
    row_field: Field,
    col_field: Field,
    value_field: Option<Field>,
    aggregator: Aggregator,
}

impl<'a, R: FieldAccess> PivotCalculator<'a, R> {
    /// Validates the request against `schema`.
    pub fn new(records: &'a [R], schema: &Schema, spec: &AggregationSpec) -> Result<Self, EngineError> {
        let row_field = schema.resolve(&spec.row_field)?;
        let col_field = schema.resolve(&spec.col_field)?;
        let value_field = resolve_value_field(schema, spec.value_field.as_deref(), spec.aggregator)?;

        Ok(PivotCalculator {
            records,
            row_field,
            col_field,
            value_field,
            aggregator: spec.aggregator,
        })
    }

    /// Executes the calculation. Infallible once the request is resolved.
    pub fn calculate(&self) -> PivotResult {
        let grouping = Grouping::run(
            self.records,
            &[self.row_field, self.col_field],
            self.value_field,
        );

        let row_ids = grouping.axes[0].sorted_ids();
        let col_ids = grouping.axes[1].sorted_ids();

        let values: Vec<Vec<f64>> = row_ids
            .iter()
            .map(|&r| {
                col_ids
                    .iter()
                    .map(|&c| grouping.value_at(&[r, c], self.aggregator))
                    .collect()
            })
            .collect();

        log::debug!(
            "pivot {} x {} ({}): {} of {} records -> {} rows, {} columns",
            self.row_field,
            self.col_field,
            self.aggregator.label(),
            grouping.included,
            self.records.len(),
            row_ids.len(),
            col_ids.len()
        );

        PivotResult {
            row_field: self.row_field,
            col_field: self.col_field,
            value_field: self.value_field,
            aggregator: self.aggregator,
            row_keys: grouping.axis_keys(0, &row_ids),
            col_keys: grouping.axis_keys(1, &col_ids),
            values,
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Cross-tabulates `records` as described by `spec`.
/// This is the main entry point for the calculation engine.
pub fn aggregate<R: FieldAccess>(
    records: &[R],
    schema: &Schema,
    spec: &AggregationSpec,
) -> Result<PivotResult, EngineError> {
    Ok(PivotCalculator::new(records, schema, spec)?.calculate())
}

/// Groups `records` by a single field.
pub fn summarize<R: FieldAccess>(
    records: &[R],
    schema: &Schema,
    key_field: &str,
    value_field: Option<&str>,
    aggregator: Aggregator,
    order: SummaryOrder,
) -> Result<FlatSummary, EngineError> {
    let key = schema.resolve(key_field)?;
    let value = resolve_value_field(schema, value_field, aggregator)?;

    let grouping = Grouping::run(records, &[key], value);
    let sorted = grouping.axes[0].sorted_ids();

    let mut entries: Vec<SummaryEntry> = sorted
        .iter()
        .zip(grouping.axis_keys(0, &sorted))
        .map(|(&id, key)| SummaryEntry {
            key,
            value: grouping.value_at(&[id], aggregator),
        })
        .collect();

    if order == SummaryOrder::ByValueDescending {
        // Stable sort keeps key order among equal values
        entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    }

    log::debug!(
        "summary by {} ({}): {} of {} records -> {} entries",
        key,
        aggregator.label(),
        grouping.included,
        records.len(),
        entries.len()
    );

    Ok(FlatSummary {
        key_field: key,
        value_field: value,
        aggregator,
        entries,
    })
}

/// Record counts per value of `field`, most frequent first.
pub fn count_by<R: FieldAccess>(
    records: &[R],
    schema: &Schema,
    field: &str,
) -> Result<FlatSummary, EngineError> {
    summarize(
        records,
        schema,
        field,
        None,
        Aggregator::Count,
        SummaryOrder::ByValueDescending,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use records::Record;

    fn record(plan: &str, term: &str, credits: Option<f64>) -> Record {
        Record {
            plan_description: Some(plan.to_string()),
            admit_term: Some(term.to_string()),
            enrolled_credits: credits,
            ..Record::default()
        }
    }

    fn schema() -> Schema {
        Schema::new([
            Field::PlanCode,
            Field::PlanDescription,
            Field::AdmitTerm,
            Field::EnrolledCredits,
        ])
    }

    fn create_test_records() -> Vec<Record> {
        vec![
            record("A", "Fall 2021", Some(9.0)),
            record("B", "Fall 2021", Some(6.0)),
            record("A", "Fall 2021", None),
            record("B", "Spring 2022", Some(3.0)),
            record("B", "Spring 2022", Some(12.0)),
        ]
    }

    #[test]
    fn test_count_pivot_fills_missing_cells_with_zero() {
        let records = create_test_records();
        let spec = AggregationSpec::count("Admit Term", "Academic Plan Description");

        let result = aggregate(&records, &schema(), &spec).unwrap();

        assert_eq!(result.row_keys, vec![PivotKey::text("Fall 2021"), PivotKey::text("Spring 2022")]);
        assert_eq!(result.col_keys, vec![PivotKey::text("A"), PivotKey::text("B")]);
        assert_eq!(result.values, vec![vec![2.0, 1.0], vec![0.0, 2.0]]);
    }

    #[test]
    fn test_sum_pivot_treats_missing_values_as_zero() {
        let records = create_test_records();
        let spec = AggregationSpec::sum("Academic Plan Description", "Admit Term", "Enrolled Credits");

        let result = aggregate(&records, &schema(), &spec).unwrap();

        assert_eq!(result.get("A", "Fall 2021"), Some(9.0));
        assert_eq!(result.get("A", "Spring 2022"), Some(0.0));
        assert_eq!(result.get("B", "Spring 2022"), Some(15.0));
        assert_eq!(result.value_field, Some(Field::EnrolledCredits));
    }

    #[test]
    fn test_records_with_empty_axis_values_are_excluded() {
        let mut records = create_test_records();
        records.push(Record {
            plan_description: None,
            admit_term: Some("Fall 2021".to_string()),
            ..Record::default()
        });
        records.push(Record {
            plan_description: Some("C".to_string()),
            admit_term: None,
            ..Record::default()
        });

        let spec = AggregationSpec::count("Admit Term", "Academic Plan Description");
        let result = aggregate(&records, &schema(), &spec).unwrap();

        assert_eq!(result.grand_total(), 5.0);
        assert!(!result.col_keys.contains(&PivotKey::text("C")));
    }

    #[test]
    fn test_unknown_fields_fail() {
        let records = create_test_records();

        let spec = AggregationSpec::count("Campus", "Admit Term");
        assert_eq!(
            aggregate(&records, &schema(), &spec),
            Err(EngineError::FieldNotFound("Campus".to_string()))
        );

        let spec = AggregationSpec::sum("Admit Term", "Academic Plan", "GPA");
        assert_eq!(
            aggregate(&records, &schema(), &spec),
            Err(EngineError::FieldNotFound("GPA".to_string()))
        );
    }

    #[test]
    fn test_sum_requires_numeric_value_field() {
        let records = create_test_records();

        let mut spec = AggregationSpec::count("Admit Term", "Academic Plan");
        spec.aggregator = Aggregator::Sum;
        assert_eq!(
            aggregate(&records, &schema(), &spec),
            Err(EngineError::MissingValueField)
        );

        let spec = AggregationSpec::sum("Admit Term", "Academic Plan", "Academic Plan Description");
        assert_eq!(
            aggregate(&records, &schema(), &spec),
            Err(EngineError::NotNumeric("Academic Plan Description".to_string()))
        );
    }

    #[test]
    fn test_count_ignores_value_field() {
        let records = create_test_records();
        let mut spec = AggregationSpec::count("Admit Term", "Academic Plan Description");
        spec.value_field = Some("does not exist".to_string());

        assert!(aggregate(&records, &schema(), &spec).is_ok());
    }

    #[test]
    fn test_empty_input_gives_empty_result() {
        let records: Vec<Record> = Vec::new();
        let spec = AggregationSpec::count("Admit Term", "Academic Plan Description");

        let result = aggregate(&records, &schema(), &spec).unwrap();
        assert!(result.is_empty());
        assert!(result.col_keys.is_empty());
        assert_eq!(result.grand_total(), 0.0);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let records = create_test_records();
        let spec = AggregationSpec::sum("Academic Plan Description", "Admit Term", "Enrolled Credits");

        let first = aggregate(&records, &schema(), &spec).unwrap();
        let second = aggregate(&records, &schema(), &spec).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_numeric_axis_sorts_numerically() {
        let records = vec![
            record("A", "Fall 2021", Some(12.0)),
            record("A", "Fall 2021", Some(9.0)),
            record("A", "Fall 2021", Some(3.0)),
        ];
        let spec = AggregationSpec::count("Enrolled Credits", "Academic Plan Description");

        let result = aggregate(&records, &schema(), &spec).unwrap();
        let labels: Vec<String> = result.row_keys.iter().map(PivotKey::label).collect();
        assert_eq!(labels, vec!["3", "9", "12"]);
    }

    #[test]
    fn test_summarize_by_term_is_term_ordered() {
        let records = vec![
            record("A", "Spring 2022", Some(3.0)),
            record("A", "Garbage", Some(1.0)),
            record("A", "Fall 2021", Some(9.0)),
        ];

        let summary = summarize(
            &records,
            &schema(),
            "admitTerm",
            Some("enrolledCredits"),
            Aggregator::Sum,
            SummaryOrder::ByKey,
        )
        .unwrap();

        assert_eq!(summary.labels(), vec!["Fall 2021", "Spring 2022", "Garbage"]);
        assert_eq!(summary.total(), 13.0);
    }

    #[test]
    fn test_count_by_orders_most_frequent_first() {
        let records = create_test_records();
        let summary = count_by(&records, &schema(), "Academic Plan Description").unwrap();

        assert_eq!(summary.labels(), vec!["B", "A"]);
        assert_eq!(summary.get("B"), Some(3.0));
        assert_eq!(summary.get("A"), Some(2.0));
    }

    #[test]
    fn test_count_by_ties_keep_key_order() {
        let records = vec![record("Z", "Fall 2021", None), record("M", "Fall 2021", None)];
        let summary = count_by(&records, &schema(), "Academic Plan Description").unwrap();
        assert_eq!(summary.labels(), vec!["M", "Z"]);
    }
}
