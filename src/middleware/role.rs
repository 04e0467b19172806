//! Role-gated admin extractors.
//!
//! Each extractor authenticates the admin (including the existence check) and
//! then runs the authorization gate against a fixed role list. Superadmin
//! passes every gate.
//!
//! ```rust,ignore
//! pub async fn create_admin(
//!     State(state): State<AppState>,
//!     RequireSuperadmin(admin): RequireSuperadmin,
//!     ValidatedJson(dto): ValidatedJson<CreateAdminDto>,
//! ) -> Result<(StatusCode, Json<AdminResponse>), AppError> { ... }
//! ```

/// Declares an extractor that admits admins holding one of the listed roles.
#[macro_export]
macro_rules! require_roles {
    ($name:ident, [$($role:expr),* $(,)?]) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub $crate::middleware::auth::AuthAdmin);

        impl $name {
            pub const ROLES: &'static [stulink_auth::AdminRole] = &[$($role),*];
        }

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = stulink_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let admin = <$crate::middleware::auth::AuthAdmin as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;

                stulink_auth::authorize(&admin.0, Self::ROLES)?;

                Ok($name(admin))
            }
        }
    };
}

use stulink_auth::AdminRole;

require_roles!(RequireSuperadmin, [AdminRole::Superadmin]);
require_roles!(
    RequireTokenIssuer,
    [AdminRole::TokenGenerator, AdminRole::Admin, AdminRole::Superadmin]
);
