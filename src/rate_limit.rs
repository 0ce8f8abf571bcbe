//! Per-client request quota
//!
//! Fixed-window counter keyed by client address. A client gets
//! `max_requests` requests per window; the window restarts on the first
//! request after it expires. The address is the TCP peer unless the limiter
//! is told to trust `X-Forwarded-For` from a reverse proxy.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tokio::sync::RwLock;

use crate::config::RateLimitConfig;
use crate::error::AppError;

const FORWARDED_FOR: &str = "x-forwarded-for";
const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Request quota shared by all handlers it guards
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<RateLimiterInner>,
}

struct RateLimiterInner {
    max_requests: u32,
    window: Duration,
    trust_proxy: bool,
    clients: RwLock<HashMap<String, Window>>,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// A client has used up its quota for the current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaExceeded {
    pub retry_after: Duration,
}

impl RateLimiter {
    /// Limiter keyed on the peer address only
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_proxy(max_requests, window, false)
    }

    /// Limiter that keys on the first `X-Forwarded-For` hop when `trust_proxy` is set
    pub fn with_proxy(max_requests: u32, window: Duration, trust_proxy: bool) -> Self {
        Self {
            inner: Arc::new(RateLimiterInner {
                max_requests,
                window,
                trust_proxy,
                clients: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::with_proxy(config.max_requests, config.window(), config.trust_proxy)
    }

    pub fn max_requests(&self) -> u32 {
        self.inner.max_requests
    }

    pub fn window(&self) -> Duration {
        self.inner.window
    }

    /// Count a request for `client`, returning how many remain in the window
    pub async fn check(&self, client: &str) -> Result<u32, QuotaExceeded> {
        let now = Instant::now();
        let mut clients = self.inner.clients.write().await;

        let window = clients.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.inner.window {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        if window.count >= self.inner.max_requests {
            let elapsed = now.duration_since(window.started);
            return Err(QuotaExceeded {
                retry_after: self.inner.window.saturating_sub(elapsed),
            });
        }

        window.count += 1;
        Ok(self.inner.max_requests - window.count)
    }

    /// Drop clients whose window has expired
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let window = self.inner.window;
        let mut clients = self.inner.clients.write().await;
        let before = clients.len();
        clients.retain(|_, w| now.duration_since(w.started) < window);
        let purged = before - clients.len();
        if purged > 0 {
            tracing::debug!(count = purged, "Purged expired rate limit windows");
        }
        purged
    }

    /// Number of clients currently tracked
    pub async fn tracked_clients(&self) -> usize {
        self.inner.clients.read().await.len()
    }
}

/// Middleware enforcing the quota before the handler runs
pub async fn enforce(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_key(
        request.headers(),
        request.extensions().get::<ConnectInfo<SocketAddr>>(),
        limiter.inner.trust_proxy,
    );

    let remaining = match limiter.check(&client).await {
        Ok(remaining) => remaining,
        Err(exceeded) => {
            tracing::warn!(client = %client, "Rate limit exceeded");
            return Err(AppError::RateLimited {
                limit: limiter.max_requests(),
                window_minutes: limiter.window().as_secs() / 60,
                retry_after: exceeded.retry_after,
            });
        }
    };

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(LIMIT_HEADER, HeaderValue::from(limiter.max_requests()));
    headers.insert(REMAINING_HEADER, HeaderValue::from(remaining));
    Ok(response)
}

/// Peer address, or the first `X-Forwarded-For` hop when the proxy is trusted
fn client_key(
    headers: &HeaderMap,
    peer: Option<&ConnectInfo<SocketAddr>>,
    trust_proxy: bool,
) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .filter(|_| trust_proxy)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(addr), _) => addr.to_string(),
        (None, Some(ConnectInfo(addr))) => addr.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}
