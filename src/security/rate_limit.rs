//! Per-client rate limiting for the news endpoints.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;
use crate::http::response::json_error;
use crate::observability::metrics;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

/// A simple token bucket rate limiter.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    /// Take a token, or report how long until one is available.
    fn try_acquire(&mut self, capacity: f64, refill_rate: f64, now: Instant) -> Result<(), Duration> {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - self.tokens) / refill_rate))
        }
    }
}

/// Token buckets keyed by client IP.
///
/// A client may spend `max_requests` at once; tokens come back at
/// `max_requests / window_secs` per second.
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
    capacity: f64,
    refill_rate: f64,
    window: Duration,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let window = Duration::from_secs(config.window_secs.max(1));
        let capacity = f64::from(config.max_requests.max(1));
        Self {
            buckets: DashMap::new(),
            capacity,
            refill_rate: capacity / window.as_secs_f64(),
            window,
        }
    }

    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.capacity, now));
        bucket.try_acquire(self.capacity, self.refill_rate, now)
    }

    /// Drop buckets idle for a full window; they would be full again anyway.
    pub fn prune(&self) {
        self.prune_at(Instant::now());
    }

    fn prune_at(&self, now: Instant) {
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_update) < self.window);
    }

    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

/// Middleware function for per-IP rate limiting.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match limiter.check(&key) {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            tracing::warn!(client = %key, retry_after_secs = retry_after.as_secs(), "Rate limit exceeded");
            metrics::record_rate_limited();
            let mut response = json_error(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE);
            let secs = retry_after.as_secs_f64().ceil() as u64;
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
            response
        }
    }
}
