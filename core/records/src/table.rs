//! FILENAME: core/records/src/table.rs
//! PURPOSE: The rectangular table handed over by the loader.
//! CONTEXT: Unlike a sparse spreadsheet grid, an uploaded enrollment export is
//! dense: one header row followed by data rows of the same width.

use serde::{Deserialize, Serialize};
use crate::cell::CellValue;

/// A rectangular table of named columns.
/// Row and column indices are 0-based; row 0 is the first data row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Column names from the header row, trimmed.
    pub headers: Vec<String>,

    /// Data rows. Every row has exactly `headers.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Creates an empty table with the given headers.
    pub fn new(headers: Vec<String>) -> Self {
        RawTable {
            headers: headers.into_iter().map(|h| h.trim().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a data row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.headers.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Finds a column by header name (case-insensitive, trimmed).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(wanted))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Retrieves a cell. Out-of-range coordinates read as `Empty`.
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }
}
