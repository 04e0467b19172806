use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use fake::Fake;
use fake::faker::name::en::Name;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use stulink::router::init_router;
use stulink::state::AppState;
use stulink::stulink_auth::{AdminRole, create_admin_token, create_user_token};
use stulink::stulink_config::{CorsConfig, JwtConfig, RateLimitConfig};
use stulink::stulink_core::hash_password;

pub const TEST_PASSWORD: &str = "testpass123";

#[allow(dead_code)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub referral_code: String,
}

#[allow(dead_code)]
pub struct TestAdmin {
    pub id: Uuid,
    pub username: String,
    pub role: AdminRole,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        session_expiry: 3600,
    }
}

pub fn test_state(pool: PgPool, rate_limit_config: RateLimitConfig) -> AppState {
    AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        rate_limit_config,
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool, RateLimitConfig::disabled()))
}

pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

/// Inserts a user with [`TEST_PASSWORD`].
pub async fn create_test_user(pool: &PgPool, is_verified: bool) -> TestUser {
    let username = unique_name("user");
    let email = format!("{}@test.com", username);
    let referral_code = Uuid::new_v4().simple().to_string()[..16].to_string();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO users (name, username, email, password, referral_code, is_verified)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(Name().fake::<String>())
    .bind(&username)
    .bind(&email)
    .bind(&hashed)
    .bind(&referral_code)
    .bind(is_verified)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        username,
        email,
        referral_code,
    }
}

/// Inserts an admin with [`TEST_PASSWORD`].
pub async fn create_test_admin(pool: &PgPool, role: AdminRole) -> TestAdmin {
    let username = unique_name("admin");
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO admins (username, password, role) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&username)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestAdmin { id, username, role }
}

#[allow(dead_code)]
pub fn user_token(user: &TestUser) -> String {
    create_user_token(user.id, &test_jwt_config()).unwrap()
}

#[allow(dead_code)]
pub fn admin_token(admin: &TestAdmin) -> String {
    create_admin_token(admin.id, admin.role, &test_jwt_config()).unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
