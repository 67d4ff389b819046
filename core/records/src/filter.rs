//! FILENAME: core/records/src/filter.rs
//! PURPOSE: Chooses which plan descriptions a summary covers.
//! CONTEXT: The shell offers the distinct plans as options and pre-selects the
//! preferred programs that are actually present in the upload.

use std::collections::BTreeSet;
use crate::record::{FieldAccess, FieldValue, Record};
use crate::schema::Field;

/// Resolves the working selection.
///
/// With an explicit request, returns the requested names that exist in
/// `all_plans` (request order, no duplicates). Without one, returns the
/// preferred defaults that exist in `all_plans`, in default order.
pub fn select(
    all_plans: &BTreeSet<String>,
    requested: Option<&[String]>,
    preferred_defaults: &[String],
) -> Vec<String> {
    let candidates = requested.unwrap_or(preferred_defaults);

    let mut selection: Vec<String> = Vec::new();
    for name in candidates {
        if all_plans.contains(name) && !selection.contains(name) {
            selection.push(name.clone());
        }
    }

    if let Some(requested) = requested {
        let missing = missing_names(all_plans, requested);
        if !missing.is_empty() {
            log::warn!(
                "dropped {} requested plan(s) not present in the data: {:?}",
                missing.len(),
                missing
            );
        }
    }

    selection
}

/// Distinct requested names that do not occur in `all_plans`, in request order.
fn missing_names<'a>(all_plans: &BTreeSet<String>, requested: &'a [String]) -> Vec<&'a str> {
    let mut missing: Vec<&str> = Vec::new();
    for name in requested {
        if !all_plans.contains(name) && !missing.contains(&name.as_str()) {
            missing.push(name);
        }
    }
    missing
}

/// The distinct, non-empty values of `field` across `records`, sorted.
pub fn distinct_values<R: FieldAccess>(records: &[R], field: Field) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(|r| match r.field_value(field) {
            FieldValue::Text(s) => Some(s.to_string()),
            _ => None,
        })
        .collect()
}

/// Records whose `field` value is one of `selection`.
/// Records without a value for `field` are never retained.
pub fn retain_selected(records: &[Record], field: Field, selection: &[String]) -> Vec<Record> {
    let wanted: BTreeSet<&str> = selection.iter().map(String::as_str).collect();
    records
        .iter()
        .filter(|r| matches!(r.field_value(field), FieldValue::Text(s) if wanted.contains(s)))
        .cloned()
        .collect()
}
