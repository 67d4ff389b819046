//! FILENAME: core/records/src/cell.rs
//! PURPOSE: Defines the value held by a single cell of an uploaded table.
//! CONTEXT: The loader converts whatever the spreadsheet reader produced into
//! `CellValue`s; record construction then narrows them to typed fields.

use serde::{Deserialize, Serialize};

/// Represents the raw data within a cell of the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(String),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// True for empty cells and text cells holding only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the display value of the cell as a String.
    /// Integral numbers are rendered without a decimal part so that a plan
    /// code typed as `1234` reads back as "1234", not "1234.0".
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Error(e) => format!("#{}", e).to_uppercase(),
        }
    }

    /// Text view of the cell, `None` when blank or an error.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Error(_) => None,
            v if v.is_blank() => None,
            v => Some(v.display_value()),
        }
    }

    /// Numeric view of the cell. Numeric text ("12", " 7.5 ") parses;
    /// anything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}
