//! Conversion dispatcher
//!
//! Checks the response cache, runs the encoder for the requested format on
//! the blocking pool, and stores successful results. Failures are never
//! cached.

use std::sync::Arc;

use serde_json::Value;

use super::cache::{CacheKey, ResponseCache};
use super::error::{ConvertError, ConvertResult};
use super::validate::NormalizedInput;
use super::ConversionResult;
use crate::formats::{EncodeError, FormatTag};

/// Converts validated input, serving repeats from the cache
#[derive(Clone, Default)]
pub struct Converter {
    cache: ResponseCache,
}

impl Converter {
    pub fn new(cache: ResponseCache) -> Self {
        Self { cache }
    }

    /// Get the response cache
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Convert input to the given format
    ///
    /// A cache hit is returned as-is, with no freshness check.
    pub async fn convert(
        &self,
        input: NormalizedInput,
        format: FormatTag,
    ) -> ConvertResult<Arc<ConversionResult>> {
        let key = CacheKey::new(&input.raw, format);

        if let Some(cached) = self.cache.get(&key).await {
            tracing::debug!(
                format = %format,
                digest = %key.input_digest(),
                "Serving conversion from cache"
            );
            return Ok(cached);
        }

        let bytes = encode_blocking(format, input.value)
            .await
            .map_err(|source| {
                tracing::warn!(format = %format, error = %source, "Conversion failed");
                ConvertError::EncodingFailure { format, source }
            })?;

        let result = Arc::new(ConversionResult::new(format, bytes));
        self.cache.insert(key, result.clone()).await;

        tracing::info!(
            format = %format,
            size = result.bytes.len(),
            "Conversion complete"
        );

        Ok(result)
    }
}

/// Encoding is synchronous CPU work, so keep it off the async workers
async fn encode_blocking(format: FormatTag, value: Value) -> Result<Vec<u8>, EncodeError> {
    tokio::task::spawn_blocking(move || format.encode(&value))
        .await
        .map_err(|e| EncodeError::Worker(e.to_string()))?
}
