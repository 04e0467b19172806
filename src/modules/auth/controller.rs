use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use stulink_core::AppError;
use stulink_models::{
    AdminLoginRequest, AdminLoginResponse, AuthResponse, ErrorResponse, LoginRequest,
    RegisterRequest,
};

use super::service::AuthService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Bad request - missing or malformed fields", body = ErrorResponse),
        (status = 409, description = "Email or username already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = AuthService::register_user(&state.db, dto, &state.jwt_config).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with email or username and receive a user session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Bad request - missing or malformed fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "User account is not verified", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = AuthService::login_user(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Log in as an admin and receive an admin session token
#[utoipa::path(
    post,
    path = "/api/auth/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminLoginResponse),
        (status = 400, description = "Bad request - missing or malformed fields", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_admin(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    let response = AuthService::login_admin(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}
