//! Per-client rate limiting for `/api`.
//!
//! Clients are keyed by the socket peer address. When
//! `RATE_LIMIT_TRUST_PROXY_HEADERS` is set, the first address in
//! `x-forwarded-for`, then `x-real-ip`, take precedence over the peer.
//! Requests without any usable address share the `"unknown"` bucket.

use std::net::SocketAddr;
use std::sync::{Arc, Weak};
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, RateLimiter};

use stulink_config::RateLimitConfig;
use stulink_core::AppError;

pub type ClientRateLimiter = DefaultKeyedRateLimiter<String>;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

const UPKEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<ClientRateLimiter>,
    pub trust_proxy_headers: bool,
}

impl RateLimitState {
    /// Builds the limiter and, inside a Tokio runtime, starts its upkeep task.
    pub fn new(config: &RateLimitConfig) -> Self {
        let limiter = build_rate_limiter(config);
        if tokio::runtime::Handle::try_current().is_ok() {
            spawn_upkeep(Arc::downgrade(&limiter), UPKEEP_INTERVAL);
        }
        Self {
            limiter,
            trust_proxy_headers: config.trust_proxy_headers,
        }
    }
}

pub fn build_rate_limiter(config: &RateLimitConfig) -> Arc<ClientRateLimiter> {
    Arc::new(RateLimiter::keyed(config.quota()))
}

/// Drops buckets that have fully refilled. Returns the number of keys left.
pub fn prune_idle_clients(limiter: &ClientRateLimiter) -> usize {
    limiter.retain_recent();
    limiter.shrink_to_fit();
    limiter.len()
}

// Stops once the router owning the limiter is dropped.
fn spawn_upkeep(limiter: Weak<ClientRateLimiter>, interval: Duration) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            let Some(limiter) = limiter.upgrade() else {
                break;
            };
            let remaining = prune_idle_clients(&limiter);
            tracing::debug!(remaining, "Pruned idle rate limit buckets");
        }
    });
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
}

fn peer_ip(req: &Request) -> Option<String> {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

pub fn client_key(req: &Request, trust_proxy_headers: bool) -> String {
    let forwarded = if trust_proxy_headers {
        header_ip(req.headers(), "x-forwarded-for")
            .or_else(|| header_ip(req.headers(), "x-real-ip"))
    } else {
        None
    };

    forwarded
        .or_else(|| peer_ip(req))
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req, state.trust_proxy_headers);

    if state.limiter.check_key(&key).is_err() {
        tracing::warn!(client = %key, path = %req.uri().path(), "Rate limit exceeded");
        return AppError::too_many_requests(RATE_LIMITED_MESSAGE).into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(headers: &[(&str, &str)]) -> Request {
        let mut builder = Request::builder().uri("/api/auth/login");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn from_peer(mut req: Request, ip: [u8; 4]) -> Request {
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 4000))));
        req
    }

    fn config(per_second: u32, burst_size: u32) -> RateLimitConfig {
        RateLimitConfig {
            enabled: true,
            per_second,
            burst_size,
            trust_proxy_headers: false,
        }
    }

    #[test]
    fn test_forwarded_for_takes_first_hop_when_trusted() {
        let req = request(&[("x-forwarded-for", "203.0.113.7, 10.0.0.1")]);
        assert_eq!(client_key(&req, true), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_used_when_no_forwarded_for() {
        let req = request(&[("x-real-ip", "198.51.100.2")]);
        assert_eq!(client_key(&req, true), "198.51.100.2");
    }

    #[test]
    fn test_forwarded_headers_ignored_by_default() {
        let req = from_peer(
            request(&[
                ("x-forwarded-for", "203.0.113.7"),
                ("x-real-ip", "198.51.100.2"),
            ]),
            [192, 0, 2, 1],
        );
        assert_eq!(client_key(&req, false), "192.0.2.1");
    }

    #[test]
    fn test_peer_address_used_when_trusted_headers_absent() {
        let req = from_peer(request(&[]), [192, 0, 2, 1]);
        assert_eq!(client_key(&req, true), "192.0.2.1");
    }

    #[test]
    fn test_unknown_fallback() {
        assert_eq!(client_key(&request(&[]), false), "unknown");
        let spoofed = request(&[("x-forwarded-for", "203.0.113.7")]);
        assert_eq!(client_key(&spoofed, false), "unknown");
    }

    #[test]
    fn test_limiter_exhausts_burst_per_key() {
        let limiter = build_rate_limiter(&config(1, 2));
        let a = "a".to_string();
        let b = "b".to_string();

        assert!(limiter.check_key(&a).is_ok());
        assert!(limiter.check_key(&a).is_ok());
        assert!(limiter.check_key(&a).is_err());
        assert!(limiter.check_key(&b).is_ok());
    }

    #[test]
    fn test_prune_drops_refilled_buckets() {
        let limiter = build_rate_limiter(&config(1000, 1));
        for i in 0..50 {
            assert!(limiter.check_key(&format!("10.0.0.{i}")).is_ok());
        }
        assert_eq!(limiter.len(), 50);

        std::thread::sleep(Duration::from_millis(50));

        assert_eq!(prune_idle_clients(&limiter), 0);
        assert!(limiter.is_empty());
    }

    #[test]
    fn test_prune_keeps_throttled_buckets() {
        let limiter = build_rate_limiter(&config(1, 1));
        let key = "203.0.113.7".to_string();
        assert!(limiter.check_key(&key).is_ok());

        assert_eq!(prune_idle_clients(&limiter), 1);
        assert!(limiter.check_key(&key).is_err());
    }
}
