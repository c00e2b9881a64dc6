//! HTTP rate limiting middleware.
//!
//! Sharded in-memory limiter keyed by client IP. Two instances are mounted:
//! a per-minute limit across the API and a per-hour cap on uploads, enforced
//! before the upload handler runs.
//!
//! Responses carry `X-RateLimit-Limit` and `X-RateLimit-Remaining`; a 429
//! additionally carries `Retry-After` with the seconds until the window
//! resets.

use crate::utils::ip_extraction::extract_client_ip;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Request counter for one client within the current window.
#[derive(Clone)]
struct RateLimitBucket {
    count: u32,
    reset_at: Instant,
}

impl RateLimitBucket {
    fn new(window_seconds: u64) -> Self {
        Self {
            count: 0,
            reset_at: Instant::now() + Duration::from_secs(window_seconds),
        }
    }

    fn check_and_increment(&mut self, limit: u32, window_seconds: u64) -> (bool, u32) {
        let now = Instant::now();

        // Reset if window expired
        if now >= self.reset_at {
            self.count = 0;
            self.reset_at = now + Duration::from_secs(window_seconds);
        }

        if self.count < limit {
            self.count += 1;
            (true, limit.saturating_sub(self.count))
        } else {
            (false, 0)
        }
    }

    fn reset_in(&self) -> Duration {
        self.reset_at.saturating_duration_since(Instant::now())
    }
}

/// Sharded in-memory rate limiter.
///
/// Keys are hashed across multiple shards (separate maps behind separate
/// mutexes) to reduce lock contention under load.
#[derive(Clone)]
pub struct HttpRateLimiter {
    shards: Vec<Arc<Mutex<HashMap<String, RateLimitBucket>>>>,
    shard_count: usize,
    limit_per_window: u32,
    window_seconds: u64,
    max_buckets: usize,
    trusted_proxy_count: usize,
    exceeded_message: &'static str,
}

impl HttpRateLimiter {
    /// Create a new rate limiter with the default shard count (16).
    pub fn new(
        limit_per_window: u32,
        window_seconds: u64,
        trusted_proxy_count: usize,
        exceeded_message: &'static str,
    ) -> Self {
        Self::with_shards(
            limit_per_window,
            window_seconds,
            trusted_proxy_count,
            exceeded_message,
            16,
        )
    }

    pub fn with_shards(
        limit_per_window: u32,
        window_seconds: u64,
        trusted_proxy_count: usize,
        exceeded_message: &'static str,
        shard_count: usize,
    ) -> Self {
        let shards = (0..shard_count)
            .map(|_| Arc::new(Mutex::new(HashMap::new())))
            .collect();
        Self {
            shards,
            shard_count,
            limit_per_window,
            window_seconds,
            max_buckets: 10_000,
            trusted_proxy_count,
            exceeded_message,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit_per_window
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shard_count
    }

    /// Check and consume one request for `key`.
    ///
    /// Returns the remaining allowance, or the time until the window resets
    /// when the limit is exhausted.
    pub async fn check_rate_limit(&self, key: &str) -> Result<u32, Duration> {
        let shard = &self.shards[self.shard_index(key)];
        let mut buckets = shard.lock().await;

        // Bound memory: drop expired buckets once a shard fills up, then
        // evict the oldest if still at capacity.
        if buckets.len() >= self.max_buckets {
            let now = Instant::now();
            let grace_period = Duration::from_secs(self.window_seconds);
            buckets.retain(|_key, bucket| {
                bucket.reset_at > now || (now - bucket.reset_at) < grace_period
            });

            if buckets.len() >= self.max_buckets {
                let oldest_key = buckets
                    .iter()
                    .min_by_key(|(_, bucket)| bucket.reset_at)
                    .map(|(k, _)| k.clone());
                if let Some(key_to_remove) = oldest_key {
                    buckets.remove(&key_to_remove);
                    tracing::debug!(
                        removed_key = %key_to_remove,
                        "Evicted oldest rate limit bucket due to capacity limit"
                    );
                }
            }
        }

        let window_seconds = self.window_seconds;
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| RateLimitBucket::new(window_seconds));

        let (allowed, remaining) = bucket.check_and_increment(self.limit_per_window, window_seconds);
        if allowed {
            Ok(remaining)
        } else {
            Err(bucket.reset_in())
        }
    }
}

fn set_header(response: &mut Response, name: &'static str, value: &str) {
    if let Ok(header_value) = HeaderValue::from_str(value) {
        response.headers_mut().insert(name, header_value);
    }
}

/// Rate limiting middleware keyed by validated client IP.
pub async fn rate_limit_middleware(
    State(rate_limiter): State<Arc<HttpRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let socket_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let ip = extract_client_ip(
        request.headers(),
        socket_addr.as_ref(),
        rate_limiter.trusted_proxy_count,
    );
    let rate_limit_key = format!("ip:{}", ip);
    let limit = rate_limiter.limit();

    match rate_limiter.check_rate_limit(&rate_limit_key).await {
        Ok(remaining) => {
            let mut response = next.run(request).await;
            set_header(&mut response, "X-RateLimit-Limit", &limit.to_string());
            set_header(&mut response, "X-RateLimit-Remaining", &remaining.to_string());
            response
        }
        Err(reset_in) => {
            tracing::warn!(
                key = %rate_limit_key,
                limit = limit,
                path = %request.uri().path(),
                "Rate limit exceeded"
            );

            let reset_seconds = reset_in.as_secs().max(1);
            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                axum::Json(serde_json::json!({
                    "error": rate_limiter.exceeded_message
                })),
            )
                .into_response();

            set_header(&mut response, "X-RateLimit-Limit", &limit.to_string());
            set_header(&mut response, "X-RateLimit-Remaining", "0");
            set_header(&mut response, "Retry-After", &reset_seconds.to_string());

            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_up_to_limit_then_rejects() {
        let limiter = HttpRateLimiter::new(3, 3600, 1, "Too many uploads.");

        for expected_remaining in [2u32, 1, 0] {
            let remaining = limiter
                .check_rate_limit("ip:203.0.113.7")
                .await
                .expect("should be allowed");
            assert_eq!(remaining, expected_remaining);
        }

        let reset_in = limiter
            .check_rate_limit("ip:203.0.113.7")
            .await
            .expect_err("should be rejected");
        assert!(reset_in <= Duration::from_secs(3600));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let limiter = HttpRateLimiter::new(1, 3600, 1, "Too many uploads.");

        assert!(limiter.check_rate_limit("ip:203.0.113.7").await.is_ok());
        assert!(limiter.check_rate_limit("ip:203.0.113.7").await.is_err());
        assert!(limiter.check_rate_limit("ip:203.0.113.8").await.is_ok());
    }

    #[test]
    fn bucket_resets_after_window() {
        let mut bucket = RateLimitBucket::new(60);
        let (allowed, _) = bucket.check_and_increment(1, 60);
        assert!(allowed);
        let (allowed, _) = bucket.check_and_increment(1, 60);
        assert!(!allowed);

        // Force the window into the past; next check starts a fresh count.
        bucket.reset_at = Instant::now() - Duration::from_secs(1);
        let (allowed, remaining) = bucket.check_and_increment(1, 60);
        assert!(allowed);
        assert_eq!(remaining, 0);
    }
}
