//! FILENAME: core/records/src/lib.rs
//! PURPOSE: Main library entry point for enrollment records.
//! CONTEXT: Shared types for the pivot and revenue engines: the raw table,
//! typed records and their schema, plus the per-record codecs (admit term,
//! student type) and the plan selector.

pub mod cell;
pub mod config;
pub mod error;
pub mod filter;
pub mod record;
pub mod schema;
pub mod student;
pub mod table;
pub mod term;

// Re-export commonly used types at the crate root
pub use cell::CellValue;
pub use config::{Config, PlanCost, PlanCostConfig};
pub use error::EngineError;
pub use filter::{distinct_values, retain_selected, select};
pub use record::{load_validated, Dataset, FieldAccess, FieldValue, Record};
pub use schema::{Field, FieldKind, Schema, REQUIRED_COLUMNS};
pub use student::{classify, StudentType};
pub use table::RawTable;
pub use term::{compare_term, compare_term_labels, normalize, sort_terms, TermKey};
