//! FILENAME: core/pivot-engine/src/cache.rs
//! Axis Cache - internal representation used while grouping.
//!
//! Each distinct axis value is stored once and referenced by a `ValueId`.
//! Aggregates are accumulated per `GroupKey` (a short vector of ids), and
//! the final ordering of an axis is computed once over the distinct values,
//! not over every record.

use std::cmp::Ordering;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use records::{compare_term_labels, Field, FieldValue};
use crate::definition::Aggregator;

// ============================================================================
// VALUE INTERNING
// ============================================================================

/// A reference to an interned value within an axis cache.
pub type ValueId = u32;

/// A normalized, hashable representation of a non-empty field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheValue {
    Number(OrderedFloat),
    Text(String),
}

impl CacheValue {
    /// `None` for empty values; those never become axis keys.
    pub fn from_field(value: FieldValue<'_>) -> Option<CacheValue> {
        match value {
            FieldValue::Empty => None,
            FieldValue::Number(n) => Some(CacheValue::Number(OrderedFloat(n))),
            FieldValue::Text(s) => Some(CacheValue::Text(s.to_string())),
        }
    }
}

/// Wrapper around f64 that implements Eq and Hash for use as HashMap keys.
/// NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // 0.0 and -0.0 compare equal, so they must hash equal
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

// ============================================================================
// AXIS CACHE
// ============================================================================

/// Distinct values observed on one axis, in first-seen order.
#[derive(Debug, Clone)]
pub struct AxisCache {
    /// The field this axis groups by.
    pub field: Field,

    value_to_id: FxHashMap<CacheValue, ValueId>,
    id_to_value: Vec<CacheValue>,
}

impl AxisCache {
    pub fn new(field: Field) -> Self {
        AxisCache {
            field,
            value_to_id: FxHashMap::default(),
            id_to_value: Vec::new(),
        }
    }

    /// Interns a value and returns its ValueId.
    /// If the value already exists, returns the existing ID.
    pub fn intern(&mut self, value: CacheValue) -> ValueId {
        if let Some(&id) = self.value_to_id.get(&value) {
            return id;
        }

        let id = self.id_to_value.len() as ValueId;
        self.id_to_value.push(value.clone());
        self.value_to_id.insert(value, id);
        id
    }

    pub fn get_value(&self, id: ValueId) -> Option<&CacheValue> {
        self.id_to_value.get(id as usize)
    }

    pub fn unique_count(&self) -> usize {
        self.id_to_value.len()
    }

    /// All ids, sorted by this axis's ordering rule.
    pub fn sorted_ids(&self) -> Vec<ValueId> {
        let mut ids: Vec<ValueId> = (0..self.id_to_value.len() as ValueId).collect();
        ids.sort_by(|&a, &b| {
            compare_axis_values(
                self.field,
                &self.id_to_value[a as usize],
                &self.id_to_value[b as usize],
            )
        });
        ids
    }
}

/// Ordering of two axis values.
///
/// The admit term orders by term key (ties broken by label). Every other
/// field uses natural order: numbers ascending, then text lexically. Text
/// that parses as a number (a plan code loaded as "10") sorts as that number.
pub fn compare_axis_values(field: Field, a: &CacheValue, b: &CacheValue) -> Ordering {
    if field == Field::AdmitTerm {
        if let (CacheValue::Text(ta), CacheValue::Text(tb)) = (a, b) {
            return compare_term_labels(ta, tb);
        }
    }

    match (natural_key(a), natural_key(b)) {
        (NaturalKey::Number(na), NaturalKey::Number(nb)) => na
            .total_cmp(&nb)
            .then_with(|| tie_break(a, b)),
        (NaturalKey::Number(_), NaturalKey::Text(_)) => Ordering::Less,
        (NaturalKey::Text(_), NaturalKey::Number(_)) => Ordering::Greater,
        (NaturalKey::Text(ta), NaturalKey::Text(tb)) => ta.cmp(tb),
    }
}

enum NaturalKey<'a> {
    Number(f64),
    Text(&'a str),
}

fn natural_key(value: &CacheValue) -> NaturalKey<'_> {
    match value {
        CacheValue::Number(n) => NaturalKey::Number(n.as_f64()),
        CacheValue::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => NaturalKey::Number(n),
            _ => NaturalKey::Text(s),
        },
    }
}

/// Equal numbers from different sources ("7" vs 7.0): real numbers first,
/// then by label.
fn tie_break(a: &CacheValue, b: &CacheValue) -> Ordering {
    match (a, b) {
        (CacheValue::Number(_), CacheValue::Text(_)) => Ordering::Less,
        (CacheValue::Text(_), CacheValue::Number(_)) => Ordering::Greater,
        (CacheValue::Text(ta), CacheValue::Text(tb)) => ta.cmp(tb),
        (CacheValue::Number(_), CacheValue::Number(_)) => Ordering::Equal,
    }
}

// ============================================================================
// GROUP KEY
// ============================================================================

/// ValueIds for each grouped axis (row then column).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub values: SmallVec<[ValueId; 2]>,
}

impl GroupKey {
    pub fn new(values: &[ValueId]) -> Self {
        GroupKey {
            values: SmallVec::from_slice(values),
        }
    }
}

// ============================================================================
// AGGREGATE ACCUMULATOR
// ============================================================================

/// Running state for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateAccumulator {
    pub sum: f64,
    pub count: u64,
}

impl AggregateAccumulator {
    /// Adds one record; a missing value counts but adds nothing to the sum.
    pub fn add(&mut self, value: Option<f64>) {
        self.count += 1;
        if let Some(v) = value {
            self.sum += v;
        }
    }

    pub fn compute(&self, aggregator: Aggregator) -> f64 {
        match aggregator {
            Aggregator::Count => self.count as f64,
            Aggregator::Sum => self.sum,
        }
    }
}
