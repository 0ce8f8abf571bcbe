//! Conversion error types

use thiserror::Error;

use crate::formats::{EncodeError, FormatTag};

/// Errors from validating and converting a request
#[derive(Debug, Error)]
pub enum ConvertError {
    /// `data` was missing or not valid JSON
    #[error("Invalid JSON data: {0}")]
    InvalidInput(String),

    /// `format` was missing or not one of the known tags
    #[error("Invalid format: {0}")]
    UnsupportedFormat(String),

    /// The encoder for a known format failed
    #[error("Error converting to {}: {source}", .format.display_name())]
    EncodingFailure {
        format: FormatTag,
        #[source]
        source: EncodeError,
    },
}

/// Result type alias for conversion operations
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
