//! Response cache
//!
//! Process-lifetime map from (raw input, format) to a finished conversion.
//! Keys come from the literal input text, so `{"a":1,"b":2}` and
//! `{"b":2,"a":1}` are cached separately.
//!
//! There is no eviction, TTL or size bound: the map grows for as long as the
//! process runs and distinct inputs keep arriving.
//!
//! # Thread Safety
//!
//! Entries sit behind a `tokio::sync::RwLock`. Concurrent misses for the same
//! key may both encode and both insert; they produce identical bytes, so the
//! last write winning is harmless.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use super::ConversionResult;
use crate::formats::FormatTag;

/// Cache key: digest of the raw input plus the format
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct CacheKey {
    input_digest: String,
    format: FormatTag,
}

impl CacheKey {
    pub fn new(raw_input: &str, format: FormatTag) -> Self {
        Self {
            input_digest: hex::encode(Sha256::digest(raw_input.as_bytes())),
            format,
        }
    }

    pub fn input_digest(&self) -> &str {
        &self.input_digest
    }

    pub fn format(&self) -> FormatTag {
        self.format
    }
}

/// Shared cache of conversion results
#[derive(Clone, Default)]
pub struct ResponseCache {
    inner: Arc<ResponseCacheInner>,
}

#[derive(Default)]
struct ResponseCacheInner {
    entries: RwLock<HashMap<CacheKey, Arc<ConversionResult>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a finished conversion, counting the hit or miss
    pub async fn get(&self, key: &CacheKey) -> Option<Arc<ConversionResult>> {
        let entries = self.inner.entries.read().await;
        let found = entries.get(key).cloned();
        let counter = if found.is_some() {
            &self.inner.hits
        } else {
            &self.inner.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store a conversion. An existing entry for the key is replaced.
    pub async fn insert(&self, key: CacheKey, result: Arc<ConversionResult>) {
        let mut entries = self.inner.entries.write().await;
        entries.insert(key, result);
    }

    /// Check if a key is cached without touching the counters
    pub async fn contains(&self, key: &CacheKey) -> bool {
        let entries = self.inner.entries.read().await;
        entries.contains_key(key)
    }

    /// Get the number of cached conversions
    pub async fn len(&self) -> usize {
        let entries = self.inner.entries.read().await;
        entries.len()
    }

    /// Check if cache is empty
    pub async fn is_empty(&self) -> bool {
        let entries = self.inner.entries.read().await;
        entries.is_empty()
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        let (entries, bytes) = {
            let entries = self.inner.entries.read().await;
            let bytes = entries.values().map(|r| r.bytes.len()).sum();
            (entries.len(), bytes)
        };

        CacheStats {
            entries,
            bytes,
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Number of cached conversions
    pub entries: usize,
    /// Total size of cached output
    pub bytes: usize,
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that missed
    pub misses: u64,
}
