//! FILENAME: core/persistence/src/xlsx_writer.rs
//! Writes summary results to XLSX, one worksheet per result.
//! Values are written as raw numbers; formatting is left to the reader.

use crate::PersistenceError;
use pivot_engine::{FlatSummary, PivotKey, PivotResult};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;

const TOTAL_LABEL: &str = "Total";

/// Excel's limit on worksheet name length.
const MAX_SHEET_NAME_LEN: usize = 31;

/// One worksheet of an export.
#[derive(Debug, Clone, Copy)]
pub enum ExportSheet<'a> {
    Pivot { name: &'a str, result: &'a PivotResult },
    Summary { name: &'a str, summary: &'a FlatSummary },
}

impl ExportSheet<'_> {
    fn name(&self) -> &str {
        match self {
            ExportSheet::Pivot { name, .. } | ExportSheet::Summary { name, .. } => name,
        }
    }
}

pub fn save_xlsx(sheets: &[ExportSheet<'_>], path: &Path) -> Result<(), PersistenceError> {
    let mut xlsx = build_workbook(sheets)?;
    xlsx.save(path)?;
    Ok(())
}

pub fn save_xlsx_to_buffer(sheets: &[ExportSheet<'_>]) -> Result<Vec<u8>, PersistenceError> {
    let mut xlsx = build_workbook(sheets)?;
    Ok(xlsx.save_to_buffer()?)
}

fn build_workbook(sheets: &[ExportSheet<'_>]) -> Result<XlsxWorkbook, PersistenceError> {
    if sheets.is_empty() {
        return Err(PersistenceError::InvalidFormat("Nothing to export".to_string()));
    }

    let mut xlsx = XlsxWorkbook::new();
    let bold = Format::new().set_bold();
    let mut used_names: Vec<String> = Vec::with_capacity(sheets.len());

    for (idx, sheet) in sheets.iter().enumerate() {
        let name = unique_sheet_name(&sheet_name(sheet.name(), idx), &used_names);
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&name)?;
        used_names.push(name);

        match sheet {
            ExportSheet::Pivot { result, .. } => write_pivot(worksheet, result, &bold)?,
            ExportSheet::Summary { summary, .. } => write_summary(worksheet, summary, &bold)?,
        }
    }

    log::debug!("built export workbook with {} sheet(s)", sheets.len());
    Ok(xlsx)
}

/// Header row, one row per row key, a totals column and a totals row.
fn write_pivot(
    worksheet: &mut Worksheet,
    result: &PivotResult,
    bold: &Format,
) -> Result<(), PersistenceError> {
    let corner = format!("{} / {}", result.row_field, result.col_field);
    worksheet.write_string_with_format(0, 0, &corner, bold)?;

    let total_col = (result.col_count() + 1) as u16;
    for (c, key) in result.col_keys.iter().enumerate() {
        write_key(worksheet, 0, (c + 1) as u16, key, bold)?;
    }
    worksheet.write_string_with_format(0, total_col, TOTAL_LABEL, bold)?;

    let row_totals = result.row_totals();
    for (r, ((key, values), total)) in result.rows().zip(&row_totals).enumerate() {
        let row = (r + 1) as u32;
        write_key(worksheet, row, 0, key, bold)?;
        for (c, value) in values.iter().enumerate() {
            worksheet.write_number(row, (c + 1) as u16, *value)?;
        }
        worksheet.write_number_with_format(row, total_col, *total, bold)?;
    }

    let total_row = (result.row_count() + 1) as u32;
    worksheet.write_string_with_format(total_row, 0, TOTAL_LABEL, bold)?;
    for (c, total) in result.column_totals().iter().enumerate() {
        worksheet.write_number_with_format(total_row, (c + 1) as u16, *total, bold)?;
    }
    worksheet.write_number_with_format(total_row, total_col, result.grand_total(), bold)?;

    Ok(())
}

fn write_summary(
    worksheet: &mut Worksheet,
    summary: &FlatSummary,
    bold: &Format,
) -> Result<(), PersistenceError> {
    let value_header = match summary.value_field {
        Some(field) => format!("{} of {}", summary.aggregator.label(), field),
        None => summary.aggregator.label().to_string(),
    };
    worksheet.write_string_with_format(0, 0, summary.key_field.name(), bold)?;
    worksheet.write_string_with_format(0, 1, &value_header, bold)?;

    for (r, entry) in summary.entries.iter().enumerate() {
        let row = (r + 1) as u32;
        write_key(worksheet, row, 0, &entry.key, bold)?;
        worksheet.write_number(row, 1, entry.value)?;
    }

    let total_row = (summary.len() + 1) as u32;
    worksheet.write_string_with_format(total_row, 0, TOTAL_LABEL, bold)?;
    worksheet.write_number_with_format(total_row, 1, summary.total(), bold)?;

    Ok(())
}

fn write_key(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    key: &PivotKey,
    bold: &Format,
) -> Result<(), PersistenceError> {
    match key {
        PivotKey::Number(n) => worksheet.write_number_with_format(row, col, *n, bold)?,
        PivotKey::Text(s) => worksheet.write_string_with_format(row, col, s, bold)?,
    };
    Ok(())
}

/// Makes a name Excel accepts: no `[]:*?/\`, at most 31 characters, not blank.
fn sheet_name(name: &str, idx: usize) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    if cleaned.is_empty() {
        format!("Sheet{}", idx + 1)
    } else {
        cleaned
    }
}

/// Excel compares sheet names case-insensitively. A taken name gets a
/// " (n)" suffix, shortening the base so the result still fits.
fn unique_sheet_name(name: &str, used: &[String]) -> String {
    let taken = |candidate: &str| used.iter().any(|u| u.to_lowercase() == candidate.to_lowercase());
    if !taken(name) {
        return name.to_string();
    }

    let mut n = 2usize;
    loop {
        let suffix = format!(" ({})", n);
        let base: String = name
            .chars()
            .take(MAX_SHEET_NAME_LEN - suffix.chars().count())
            .collect();
        let candidate = format!("{}{}", base.trim_end(), suffix);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
