//! Session token creation and verification.
//!
//! Users and admins receive HS256-signed session tokens from their respective
//! login endpoints. Both kinds share the lifetime configured by
//! `JWT_SESSION_EXPIRY` and are never refreshed.
//!
//! Every verification failure (bad signature, expiry, malformed payload,
//! wrong principal kind) yields the same 401 with [`UNAUTHENTICATED_MESSAGE`]
//! so callers cannot tell why a credential was rejected.
//!
//! # Example
//!
//! ```ignore
//! use stulink_auth::{create_admin_token, verify_admin_token, AdminRole};
//! use stulink_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_admin_token(admin_id, AdminRole::TokenGenerator, &config)?;
//! let claims = verify_admin_token(&token, &config)?;
//! assert_eq!(claims.role, AdminRole::TokenGenerator);
//! ```

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use stulink_config::JwtConfig;
use stulink_core::AppError;

use crate::claims::{AdminClaims, Claims, PrincipalKind, UserClaims};
use crate::roles::AdminRole;

/// Message for every rejected session credential.
pub const UNAUTHENTICATED_MESSAGE: &str = "Not authorized";

fn unauthenticated() -> AppError {
    AppError::unauthorized(UNAUTHENTICATED_MESSAGE)
}

fn sign(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

fn session_claims(
    sub: Uuid,
    kind: PrincipalKind,
    role: Option<AdminRole>,
    jwt_config: &JwtConfig,
) -> Claims {
    let now = Utc::now().timestamp() as usize;
    Claims {
        sub: sub.to_string(),
        kind,
        role,
        exp: now + jwt_config.session_expiry as usize,
        iat: now,
    }
}

/// Creates a session token for an end user.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_user_token(user_id: Uuid, jwt_config: &JwtConfig) -> Result<String, AppError> {
    sign(
        &session_claims(user_id, PrincipalKind::User, None, jwt_config),
        jwt_config,
    )
}

/// Creates a session token for an admin, embedding the admin's role.
///
/// The embedded role is what the authorization gate checks; it is not
/// re-read from the database on each request.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn create_admin_token(
    admin_id: Uuid,
    role: AdminRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    sign(
        &session_claims(admin_id, PrincipalKind::Admin, Some(role), jwt_config),
        jwt_config,
    )
}

/// Verifies signature and expiry and returns the raw claims.
///
/// Expiry is checked with zero leeway: a token is rejected as soon as `exp`
/// is in the past.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| unauthenticated())
}

/// Verifies a user session. Admin tokens are rejected.
pub fn verify_user_token(token: &str, jwt_config: &JwtConfig) -> Result<UserClaims, AppError> {
    verify_token(token, jwt_config)?
        .into_user()
        .ok_or_else(unauthenticated)
}

/// Verifies an admin session. User tokens and admin tokens without a role
/// are rejected.
pub fn verify_admin_token(token: &str, jwt_config: &JwtConfig) -> Result<AdminClaims, AppError> {
    verify_token(token, jwt_config)?
        .into_admin()
        .ok_or_else(unauthenticated)
}
