//! Grid codec error types

use thiserror::Error;

/// Errors raised by grid encoding and decoding
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Coordinate out of range or unsupported code length
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
    /// Code that this encoder could not have produced
    #[error("malformed code '{code}': {reason}")]
    MalformedCode { code: String, reason: String },
}

impl CodecError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        CodecError::InvalidInput { reason: reason.into() }
    }

    pub(crate) fn malformed(code: &str, reason: impl Into<String>) -> Self {
        CodecError::MalformedCode {
            code: code.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for grid codec operations
pub type CodecResult<T> = Result<T, CodecError>;
