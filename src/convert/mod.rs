//! JSON conversion pipeline
//!
//! ```text
//! ConvertRequest ──validate──▶ NormalizedInput + FormatTag
//!                                     │
//!                                     ▼
//!                                 Converter ──hit──▶ ResponseCache
//!                                     │ miss
//!                                     ▼
//!                              FormatTag::encode ──▶ ConversionResult
//! ```

mod cache;
mod dispatcher;
mod error;
mod validate;

pub use cache::{CacheKey, CacheStats, ResponseCache};
pub use dispatcher::Converter;
pub use error::{ConvertError, ConvertResult};
pub use validate::{normalize, parse_format, ConvertRequest, NormalizedInput};

use crate::formats::FormatTag;

/// Encoded output plus the headers needed to serve it as a download
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub format: FormatTag,
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

impl ConversionResult {
    pub fn new(format: FormatTag, bytes: Vec<u8>) -> Self {
        Self {
            format,
            bytes,
            content_type: format.content_type(),
            filename: format.filename(),
        }
    }
}
