//! JWT claim structures for session credentials.
//!
//! A single wire shape, [`Claims`], covers both principal kinds. After
//! verification it is narrowed into [`UserClaims`] or [`AdminClaims`], which
//! is what the rest of the application works with.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::roles::AdminRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    User,
    Admin,
}

/// Signed session payload.
///
/// - `sub`: principal id
/// - `kind`: which table `sub` refers to
/// - `role`: present on admin sessions only
/// - `exp` / `iat`: Unix timestamps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub kind: PrincipalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserClaims {
    pub user_id: Uuid,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminClaims {
    pub admin_id: Uuid,
    pub role: AdminRole,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn into_user(self) -> Option<UserClaims> {
        if self.kind != PrincipalKind::User || self.role.is_some() {
            return None;
        }
        Some(UserClaims {
            user_id: Uuid::parse_str(&self.sub).ok()?,
            exp: self.exp,
            iat: self.iat,
        })
    }

    pub fn into_admin(self) -> Option<AdminClaims> {
        if self.kind != PrincipalKind::Admin {
            return None;
        }
        Some(AdminClaims {
            admin_id: Uuid::parse_str(&self.sub).ok()?,
            role: self.role?,
            exp: self.exp,
            iat: self.iat,
        })
    }
}
