use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use stulink_core::AppError;
use stulink_models::{
    ErrorResponse, GenerateStuRequest, StuLink, ValidateStuRequest, ValidateStuResponse,
};

use super::service::{StuService, TOKEN_VALIDATED};
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireTokenIssuer;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Generate a batch of single-use tokens
#[utoipa::path(
    post,
    path = "/api/stus/generate",
    request_body = GenerateStuRequest,
    responses(
        (status = 201, description = "Tokens created", body = Vec<StuLink>),
        (status = 400, description = "Count out of range or invalid expiry", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - TokenGenerator, Admin or Superadmin role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "STU"
)]
#[instrument(skip(state, issuer, dto), fields(issuer_id = %issuer.admin_id()))]
pub async fn generate_stus(
    State(state): State<AppState>,
    RequireTokenIssuer(issuer): RequireTokenIssuer,
    ValidatedJson(dto): ValidatedJson<GenerateStuRequest>,
) -> Result<(StatusCode, Json<Vec<StuLink>>), AppError> {
    let links = StuService::issue(&state.db, dto.count, &dto.expires_in, issuer.admin_id()).await?;
    Ok((StatusCode::CREATED, Json(links)))
}

/// Redeem a single-use token
#[utoipa::path(
    post,
    path = "/api/stus/validate",
    request_body = ValidateStuRequest,
    responses(
        (status = 200, description = "Token redeemed", body = ValidateStuResponse),
        (status = 400, description = "Token missing from request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Invalid token", body = ErrorResponse),
        (status = 409, description = "Token already used", body = ErrorResponse),
        (status = 410, description = "Token expired", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "STU"
)]
#[instrument(skip(state, auth_user, dto), fields(user_id = %auth_user.claims.user_id))]
pub async fn validate_stu(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ValidateStuRequest>,
) -> Result<Json<ValidateStuResponse>, AppError> {
    let session = StuService::redeem(&state.db, &dto.token, auth_user.user.id).await?;
    Ok(Json(ValidateStuResponse {
        message: TOKEN_VALIDATED.to_string(),
        session,
    }))
}
