//! FILENAME: core/persistence/src/lib.rs
//! Enrollment persistence module
//!
//! Reads enrollment exports from XLSX, caches parsed uploads, loads JSON
//! configuration, and writes pivot and summary results back to XLSX.

mod cache;
mod config;
mod error;
mod xlsx_reader;
mod xlsx_writer;

pub use cache::{content_hash, TableCache, DEFAULT_CACHE_CAPACITY};
pub use config::{load_config, save_config};
pub use error::PersistenceError;
pub use xlsx_reader::{load_table, load_table_from_bytes, DEFAULT_SKIP_ROWS};
pub use xlsx_writer::{save_xlsx, save_xlsx_to_buffer, ExportSheet};

use records::{load_validated, Dataset};
use std::path::Path;

// ============================================================================
// DATASET LOADING
// ============================================================================

/// Parses an uploaded workbook and validates it into a `Dataset`.
pub fn load_dataset(bytes: &[u8], skip_rows: usize) -> Result<Dataset, PersistenceError> {
    let table = load_table_from_bytes(bytes, skip_rows)?;
    Ok(load_validated(&table)?)
}

/// Same as `load_dataset`, reading the workbook from disk.
pub fn load_dataset_from_path(path: &Path, skip_rows: usize) -> Result<Dataset, PersistenceError> {
    let table = load_table(path, skip_rows)?;
    Ok(load_validated(&table)?)
}

/// Loads through `cache`, so repeated uploads of the same bytes skip parsing.
pub fn load_dataset_cached(
    cache: &mut TableCache,
    bytes: &[u8],
    skip_rows: usize,
) -> Result<Dataset, PersistenceError> {
    let table = cache.load(bytes, skip_rows)?;
    Ok(load_validated(&table)?)
}
