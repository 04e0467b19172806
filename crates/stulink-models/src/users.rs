//! End-user models and DTOs.
//!
//! Users self-register, log in with either their email or username, and
//! redeem STUs. Each user gets an immutable referral code at registration and
//! may name the referral code of the user who referred them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A registered end user as stored in the `users` table.
///
/// `password` holds a bcrypt hash and is never serialized; use
/// [`UserProfile`] for responses.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub referral_code: String,
    pub is_verified: bool,
    pub referred_by_id: Option<Uuid>,
    pub registered_at: DateTime<Utc>,
}

/// Public view of a user, returned by `GET /api/users/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    #[schema(example = "9f3c2a71b04e5d86")]
    pub referral_code: String,
    pub is_verified: bool,
    pub referred_by_id: Option<Uuid>,
    pub registered_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            referral_code: user.referral_code,
            is_verified: user.is_verified,
            referred_by_id: user.referred_by_id,
            registered_at: user.registered_at,
        }
    }
}

/// The subset of a user echoed back on register and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    #[schema(example = "ada")]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password123")]
    pub password: String,
    /// Referral code of an existing user. Unknown codes are ignored.
    #[serde(default, alias = "referredByCode")]
    pub referred_by_code: Option<String>,
}

/// User login. `email_or_username` matches either column; email comparison
/// is case-insensitive.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "emailOrUsername")]
    #[validate(length(min = 1, message = "Email/username is required"))]
    #[schema(example = "ada@example.com")]
    pub email_or_username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Returned by user registration (201) and login (200).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}
