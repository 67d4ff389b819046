//! FILENAME: core/revenue-engine/src/lib.rs
//! Tuition revenue projection for enrollment records.
//!
//! - `projection`: per-record realized/projected revenue (`project`)
//! - `summary`: pivots and flat summaries over the projected set

pub mod projection;
pub mod summary;

pub use projection::{project, ProjectedRecord, ProjectionSet, ProjectionWarning};
pub use summary::{Projected, RevenueTotals};
