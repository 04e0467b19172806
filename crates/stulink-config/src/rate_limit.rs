//! Rate limiting configuration for the `/api` routes.
//!
//! Requests are counted per client address with a token bucket (`governor`):
//! the bucket refills at `per_second` and holds at most `burst_size` tokens.
//!
//! # Environment Variables
//!
//! - `RATE_LIMIT_ENABLED`: set to `false` or `0` to disable (default: enabled)
//! - `RATE_LIMIT_PER_SECOND`: refill rate (default: 2)
//! - `RATE_LIMIT_BURST_SIZE`: bucket capacity (default: 100)
//! - `RATE_LIMIT_TRUST_PROXY_HEADERS`: key on `X-Forwarded-For` / `X-Real-IP`
//!   instead of the peer address (default: false). Only enable behind a proxy
//!   that overwrites these headers.

use std::num::NonZeroU32;

use governor::Quota;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Requests per second replenished into each client's bucket.
    pub per_second: u32,
    /// Maximum burst a client may send before being throttled.
    pub burst_size: u32,
    /// Key clients by forwarded headers rather than the socket peer.
    pub trust_proxy_headers: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 2,
            burst_size: 100,
            trust_proxy_headers: false,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("RATE_LIMIT_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            per_second: std::env::var("RATE_LIMIT_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.per_second),
            burst_size: std::env::var("RATE_LIMIT_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.burst_size),
            trust_proxy_headers: std::env::var("RATE_LIMIT_TRUST_PROXY_HEADERS")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.trust_proxy_headers),
        }
    }

    /// A disabled configuration, used by tests that exercise many requests.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Builds the governor quota. Zero values are clamped to one.
    #[must_use]
    pub fn quota(&self) -> Quota {
        let per_second = NonZeroU32::new(self.per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        Quota::per_second(per_second).allow_burst(burst)
    }
}
