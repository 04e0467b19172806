//! Admin models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use stulink_auth::AdminRole;

/// An admin account as stored in the `admins` table. `password` is a bcrypt
/// hash.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAdminDto {
    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    #[schema(example = "issuer01")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password123")]
    pub password: String,
    pub role: AdminRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminResponse {
    pub id: Uuid,
    pub username: String,
    pub role: AdminRole,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            role: admin.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "superadmin")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginResponse {
    pub message: String,
    pub token: String,
}
