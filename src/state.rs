//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::convert::{Converter, ResponseCache};
use crate::rate_limit::RateLimiter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    converter: Converter,
    rate_limiter: Option<RateLimiter>,
}

impl AppState {
    /// Create a new application state with an empty response cache
    pub fn new(config: Config) -> Self {
        let rate_limiter = config
            .rate_limit
            .enabled
            .then(|| RateLimiter::from_config(&config.rate_limit));

        Self {
            inner: Arc::new(AppStateInner {
                converter: Converter::new(ResponseCache::new()),
                rate_limiter,
                config,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the conversion dispatcher
    pub fn converter(&self) -> &Converter {
        &self.inner.converter
    }

    /// Get the rate limiter, if enabled
    pub fn rate_limiter(&self) -> Option<&RateLimiter> {
        self.inner.rate_limiter.as_ref()
    }
}
