//! FILENAME: core/pivot-engine/src/lib.rs
//! Cross-tabulation subsystem for enrollment summaries.
//!
//! This crate groups any record type implementing `records::FieldAccess`,
//! so plain records and revenue-projected records share one engine.
//!
//! Layers:
//! - `definition`: Serializable requests (what a summary IS)
//! - `cache`: Value interning and accumulators (HOW we compute)
//! - `view`: Dense results for the shell (WHAT we display)
//! - `engine`: Calculation engine (HOW we calculate)

pub mod definition;
pub mod cache;
pub mod view;
pub mod engine;

pub use definition::*;
pub use view::*;
pub use engine::{aggregate, count_by, summarize, PivotCalculator};
