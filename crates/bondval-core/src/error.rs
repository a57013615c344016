use thiserror::Error;

/// Validation and contract errors exposed by `bondval-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("denomination cannot be empty")]
    EmptyDenomination,
    #[error("denomination '{value}' is not a whole dollar amount")]
    InvalidDenomination { value: String },
    #[error("denomination {value} is not issued for series {series}, expected one of {accepted}")]
    UnsupportedDenomination {
        value: u32,
        series: &'static str,
        accepted: String,
    },

    #[error("issue date must be MM/YYYY: '{value}'")]
    InvalidIssueDate { value: String },

    #[error("serial number cannot be empty")]
    EmptySerialNumber,
    #[error("serial number contains invalid character '{ch}' at index {index}")]
    SerialNumberInvalidChar { ch: char, index: usize },

    #[error("invalid series '{value}', expected one of EE, I, E")]
    InvalidSeries { value: String },

    #[error("invalid configuration for '{key}': {message}")]
    InvalidConfig { key: &'static str, message: String },
}
