//! Admin roles.
//!
//! Roles form a closed set stored in the Postgres `admin_role` enum. The
//! privileged role is identified by [`AdminRole::bypasses_role_checks`], never
//! by comparing strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "admin_role")]
pub enum AdminRole {
    #[sqlx(rename = "Superadmin")]
    Superadmin,
    #[sqlx(rename = "Admin")]
    Admin,
    #[sqlx(rename = "TokenGenerator")]
    TokenGenerator,
}

impl AdminRole {
    pub const ALL: [AdminRole; 3] = [
        AdminRole::Superadmin,
        AdminRole::Admin,
        AdminRole::TokenGenerator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Superadmin => "Superadmin",
            AdminRole::Admin => "Admin",
            AdminRole::TokenGenerator => "TokenGenerator",
        }
    }

    /// Superadmins pass every role requirement.
    pub fn bypasses_role_checks(&self) -> bool {
        matches!(self, AdminRole::Superadmin)
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
