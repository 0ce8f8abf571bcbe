//! Configuration management for the JSON Convert server

use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Requests allowed per client in one window
    pub max_requests: u32,
    pub window_minutes: u64,
    /// Key clients on `X-Forwarded-For`; only safe behind a reverse proxy
    pub trust_proxy: bool,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_minutes.saturating_mul(60))
    }
}

/// Error for environment values that are set but unusable
#[derive(Debug, thiserror::Error)]
#[error("Invalid value for {var}: {value:?}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            rate_limit: RateLimitConfig {
                enabled: true,
                max_requests: 15,
                window_minutes: 15,
                trust_proxy: false,
            },
        }
    }
}

impl Config {
    /// Load from `SERVER_*` and `RATE_LIMIT_*` variables, defaulting unset ones
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var(&lookup, "SERVER_PORT", defaults.server.port)?,
            },
            rate_limit: RateLimitConfig {
                enabled: parse_var(&lookup, "RATE_LIMIT_ENABLED", defaults.rate_limit.enabled)?,
                max_requests: parse_var(
                    &lookup,
                    "RATE_LIMIT_MAX_REQUESTS",
                    defaults.rate_limit.max_requests,
                )?,
                window_minutes: parse_var(
                    &lookup,
                    "RATE_LIMIT_WINDOW_MINUTES",
                    defaults.rate_limit.window_minutes,
                )?,
                trust_proxy: parse_var(
                    &lookup,
                    "RATE_LIMIT_TRUST_PROXY",
                    defaults.rate_limit.trust_proxy,
                )?,
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError { var, value }),
        None => Ok(default),
    }
}
