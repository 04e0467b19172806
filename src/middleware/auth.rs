//! Session extractors.
//!
//! [`AuthUser`] and [`AuthAdmin`] read the `Authorization: Bearer <jwt>`
//! header, verify the token for the matching principal kind, and then confirm
//! the principal still exists. Every failure is the same 401 so a caller
//! cannot tell a forged token from a deleted account.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use stulink_auth::{
    AdminClaims, UNAUTHENTICATED_MESSAGE, UserClaims, verify_admin_token,
    verify_user_token,
};
use stulink_core::AppError;
use stulink_models::User;

use crate::modules::admin::service::AdminService;
use crate::modules::users::service::UserService;
use crate::state::AppState;

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized(UNAUTHENTICATED_MESSAGE))
}

/// An authenticated end user, loaded from the database.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: UserClaims,
    pub user: User,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_user_token(bearer_token(parts)?, &state.jwt_config)?;

        let user = UserService::find_by_id(&state.db, claims.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized(UNAUTHENTICATED_MESSAGE))?;

        Ok(AuthUser { claims, user })
    }
}

/// An authenticated admin whose account still exists. The role comes from
/// the token.
#[derive(Debug, Clone, Copy)]
pub struct AuthAdmin(pub AdminClaims);

impl AuthAdmin {
    pub fn admin_id(&self) -> uuid::Uuid {
        self.0.admin_id
    }
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = verify_admin_token(bearer_token(parts)?, &state.jwt_config)?;

        if !AdminService::exists(&state.db, claims.admin_id).await? {
            return Err(AppError::unauthorized(UNAUTHENTICATED_MESSAGE));
        }

        Ok(AuthAdmin(claims))
    }
}
