mod common;

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use sqlx::PgPool;
use tower::ServiceExt;

use common::{read_json, test_state};
use stulink::router::init_router;
use stulink::stulink_config::RateLimitConfig;

fn strict_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        enabled: true,
        per_second: 1,
        burst_size: 2,
        trust_proxy_headers: false,
    }
}

fn me_request(peer: [u8; 4]) -> Request<Body> {
    let mut req = Request::builder()
        .method("GET")
        .uri("/api/users/me")
        .body(Body::empty())
        .unwrap();
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((peer, 40000))));
    req
}

fn forwarded_me_request(peer: [u8; 4], forwarded_for: &str) -> Request<Body> {
    let mut req = me_request(peer);
    req.headers_mut()
        .insert("x-forwarded-for", forwarded_for.parse().unwrap());
    req
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rate_limit_exceeded(pool: PgPool) {
    let app = init_router(test_state(pool, strict_rate_limit_config()));

    for _ in 0..2 {
        let response = app.clone().oneshot(me_request([192, 168, 1, 100])).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app.clone().oneshot(me_request([192, 168, 1, 100])).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Too many requests, please try again later.");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rate_limit_is_per_client(pool: PgPool) {
    let app = init_router(test_state(pool, strict_rate_limit_config()));

    for _ in 0..3 {
        app.clone().oneshot(me_request([10, 0, 0, 1])).await.unwrap();
    }

    let response = app.clone().oneshot(me_request([10, 0, 0, 2])).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rotating_forwarded_for_does_not_reset_quota(pool: PgPool) {
    let app = init_router(test_state(pool, strict_rate_limit_config()));
    let peer = [198, 51, 100, 9];

    for i in 0..2 {
        let response = app
            .clone()
            .oneshot(forwarded_me_request(peer, &format!("203.0.113.{i}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    for i in 2..6 {
        let response = app
            .clone()
            .oneshot(forwarded_me_request(peer, &format!("203.0.113.{i}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_trusted_proxy_headers_key_per_client(pool: PgPool) {
    let config = RateLimitConfig {
        trust_proxy_headers: true,
        ..strict_rate_limit_config()
    };
    let app = init_router(test_state(pool, config));
    let proxy = [10, 1, 1, 1];

    for _ in 0..3 {
        app.clone()
            .oneshot(forwarded_me_request(proxy, "203.0.113.50"))
            .await
            .unwrap();
    }

    let throttled = app
        .clone()
        .oneshot(forwarded_me_request(proxy, "203.0.113.50"))
        .await
        .unwrap();
    assert_eq!(throttled.status(), StatusCode::TOO_MANY_REQUESTS);

    let other_client = app
        .clone()
        .oneshot(forwarded_me_request(proxy, "203.0.113.51"))
        .await
        .unwrap();
    assert_eq!(other_client.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_not_rate_limited(pool: PgPool) {
    let app = init_router(test_state(pool, strict_rate_limit_config()));

    for _ in 0..5 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_disabled_rate_limit(pool: PgPool) {
    let app = init_router(test_state(pool, RateLimitConfig::disabled()));

    for _ in 0..10 {
        let response = app.clone().oneshot(me_request([172, 16, 0, 1])).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
