//! # Stulink Auth
//!
//! Session credentials and authorization for the Stulink API.
//!
//! - [`roles`]: the closed set of admin roles
//! - [`claims`]: JWT payload and its typed user/admin views
//! - [`jwt`]: session token creation and verification
//! - [`gate`]: role-based authorization with the Superadmin bypass
//!
//! # Example
//!
//! ```ignore
//! use stulink_auth::{AdminRole, authorize, create_admin_token, verify_admin_token};
//!
//! let token = create_admin_token(admin_id, AdminRole::TokenGenerator, &jwt_config)?;
//! let claims = verify_admin_token(&token, &jwt_config)?;
//! authorize(&claims, &[AdminRole::TokenGenerator, AdminRole::Admin])?;
//! ```

pub mod claims;
pub mod gate;
pub mod jwt;
pub mod roles;

pub use claims::{AdminClaims, Claims, PrincipalKind, UserClaims};
pub use gate::{FORBIDDEN_MESSAGE, authorize, role_satisfies};
pub use jwt::{
    UNAUTHENTICATED_MESSAGE, create_admin_token, create_user_token, verify_admin_token,
    verify_token, verify_user_token,
};
pub use roles::AdminRole;
