//! Per-bond outcomes and their failure classification.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http_client::HttpError;
use crate::{BondDescriptor, BondValuation, ValidationError};

/// Failure classification used for retry decisions and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationErrorKind {
    InvalidDescriptor,
    Transport,
    Service,
    Timeout,
    UnexpectedResponseFormat,
    FieldParse,
    Internal,
}

impl ValuationErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidDescriptor => "valuation.invalid_descriptor",
            Self::Transport => "valuation.transport",
            Self::Service => "valuation.service",
            Self::Timeout => "valuation.timeout",
            Self::UnexpectedResponseFormat => "valuation.unexpected_response_format",
            Self::FieldParse => "valuation.field_parse",
            Self::Internal => "valuation.internal",
        }
    }
}

impl Display for ValuationErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Why a single bond could not be valued.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValuationError {
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(#[from] ValidationError),

    #[error("transport error: {0}")]
    Transport(HttpError),

    #[error("calculator returned HTTP status {status}")]
    Service { status: u16 },

    #[error("dispatch deadline of {timeout_ms} ms elapsed before the valuation completed")]
    Timeout { timeout_ms: u64 },

    #[error("unexpected response format: {reason}")]
    UnexpectedResponseFormat { reason: String },

    #[error("field '{field}' could not be parsed from '{raw_value}'")]
    FieldParse {
        field: &'static str,
        raw_value: String,
    },

    #[error("valuation worker failed: {message}")]
    Internal { message: String },
}

impl ValuationError {
    pub fn unexpected_format(reason: impl Into<String>) -> Self {
        Self::UnexpectedResponseFormat {
            reason: reason.into(),
        }
    }

    pub fn field_parse(field: &'static str, raw_value: impl Into<String>) -> Self {
        Self::FieldParse {
            field,
            raw_value: raw_value.into(),
        }
    }

    pub const fn kind(&self) -> ValuationErrorKind {
        match self {
            Self::InvalidDescriptor(_) => ValuationErrorKind::InvalidDescriptor,
            Self::Transport(_) => ValuationErrorKind::Transport,
            Self::Service { .. } => ValuationErrorKind::Service,
            Self::Timeout { .. } => ValuationErrorKind::Timeout,
            Self::UnexpectedResponseFormat { .. } => ValuationErrorKind::UnexpectedResponseFormat,
            Self::FieldParse { .. } => ValuationErrorKind::FieldParse,
            Self::Internal { .. } => ValuationErrorKind::Internal,
        }
    }

    /// Transport and service failures may be transient; everything else is final.
    pub const fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Service { .. })
    }
}

impl From<HttpError> for ValuationError {
    fn from(error: HttpError) -> Self {
        Self::Transport(error)
    }
}

/// Result slot for one descriptor, at the descriptor's input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuationOutcome {
    pub index: usize,
    pub descriptor: BondDescriptor,
    pub result: Result<BondValuation, ValuationError>,
}

impl ValuationOutcome {
    pub fn new(
        index: usize,
        descriptor: BondDescriptor,
        result: Result<BondValuation, ValuationError>,
    ) -> Self {
        Self {
            index,
            descriptor,
            result,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// A descriptor that produced no valuation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationFailure {
    /// Position of the descriptor in the input batch.
    pub index: usize,
    pub descriptor: BondDescriptor,
    pub cause: ValuationErrorKind,
    pub detail: String,
}

impl ValuationFailure {
    pub fn new(index: usize, descriptor: BondDescriptor, error: &ValuationError) -> Self {
        Self {
            index,
            descriptor,
            cause: error.kind(),
            detail: error.to_string(),
        }
    }
}
