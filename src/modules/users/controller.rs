use axum::Json;
use tracing::instrument;

use stulink_core::AppError;
use stulink_models::{ErrorResponse, UserProfile};

use crate::middleware::auth::AuthUser;

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 401, description = "Unauthorized - missing, invalid or expired token", body = ErrorResponse),
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(auth_user), fields(user_id = %auth_user.claims.user_id))]
pub async fn get_me(auth_user: AuthUser) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(UserProfile::from(auth_user.user)))
}
