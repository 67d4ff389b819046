//! FILENAME: core/records/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Missing required column: '{0}'")]
    MissingColumn(String),

    #[error("Field not found: '{0}'")]
    FieldNotFound(String),

    #[error("Field is not numeric: '{0}'")]
    NotNumeric(String),

    #[error("Sum aggregation requires a value field")]
    MissingValueField,

    #[error("Missing field required for computation: '{0}'")]
    MissingField(String),
}
