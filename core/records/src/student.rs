//! FILENAME: core/records/src/student.rs
//! PURPOSE: Domestic/international classification from the visa type.

use serde::{Deserialize, Serialize};

/// The only visa code that marks a student as international.
pub const INTERNATIONAL_VISA_CODE: &str = "F1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudentType {
    Domestic,
    International,
}

impl StudentType {
    pub fn label(self) -> &'static str {
        match self {
            StudentType::Domestic => "Domestic",
            StudentType::International => "International",
        }
    }
}

impl std::fmt::Display for StudentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a student by visa type. Trimmed and case-insensitive for "F1";
/// every other value, blank or absent, is domestic.
pub fn classify(visa_type: Option<&str>) -> StudentType {
    match visa_type {
        Some(v) if v.trim().to_uppercase() == INTERNATIONAL_VISA_CODE => StudentType::International,
        _ => StudentType::Domestic,
    }
}
