//! FILENAME: core/persistence/src/xlsx_reader.rs

use crate::PersistenceError;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use records::{CellValue, RawTable};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Leading non-data rows (report title, run date) above the header.
pub const DEFAULT_SKIP_ROWS: usize = 2;

/// Loads the first worksheet of an XLSX file held in memory.
pub fn load_table_from_bytes(bytes: &[u8], skip_rows: usize) -> Result<RawTable, PersistenceError> {
    let workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    read_first_sheet(workbook, skip_rows)
}

/// Loads the first worksheet of an XLSX file on disk.
pub fn load_table(path: &Path, skip_rows: usize) -> Result<RawTable, PersistenceError> {
    let workbook: Xlsx<_> = open_workbook(path)?;
    read_first_sheet(workbook, skip_rows)
}

fn read_first_sheet<RS: Read + Seek>(
    mut workbook: Xlsx<RS>,
    skip_rows: usize,
) -> Result<RawTable, PersistenceError> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PersistenceError::InvalidFormat("Workbook contains no sheets".to_string()))??;

    table_from_range(&range, skip_rows)
}

/// Builds a table from a sheet range. `skip_rows` counts from the top of the
/// sheet (row 1), not from the first used cell, so blank banner rows count.
fn table_from_range(range: &Range<Data>, skip_rows: usize) -> Result<RawTable, PersistenceError> {
    let (Some((start_row, start_col)), Some((end_row, end_col))) = (range.start(), range.end()) else {
        log::warn!("first worksheet has no used cells");
        return Err(PersistenceError::InvalidFormat("Worksheet is empty".to_string()));
    };

    // Rows above the used range are empty and still count as skipped.
    let header_row = (skip_rows as u32).max(start_row);
    if header_row > end_row {
        return Err(PersistenceError::InvalidFormat(format!(
            "No header row after skipping {} rows",
            skip_rows
        )));
    }

    let cell_at = |row: u32, col: u32| -> CellValue {
        range
            .get_value((row, col))
            .map(convert_cell)
            .unwrap_or(CellValue::Empty)
    };

    let headers: Vec<String> = (start_col..=end_col)
        .enumerate()
        .map(|(idx, col)| match cell_at(header_row, col) {
            CellValue::Empty => format!("Unnamed: {}", idx),
            value => value.display_value(),
        })
        .collect();

    let mut table = RawTable::new(headers);
    let mut blank_rows = 0usize;

    for row in (header_row + 1)..=end_row {
        let cells: Vec<CellValue> = (start_col..=end_col).map(|col| cell_at(row, col)).collect();
        if cells.iter().all(CellValue::is_blank) {
            blank_rows += 1;
            continue;
        }
        table.push_row(cells);
    }

    log::debug!(
        "read sheet: header at row {}, {} columns, {} data rows ({} blank rows dropped)",
        header_row + 1,
        table.column_count(),
        table.row_count(),
        blank_rows
    );

    Ok(table)
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
