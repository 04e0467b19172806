//! # Stulink Models
//!
//! Database entities and request/response DTOs for the Stulink API.
//!
//! # Modules
//!
//! - [`users`]: end users, registration and login
//! - [`admins`]: admin accounts and admin login
//! - [`stus`]: single-use tokens, redemption sessions and expiry parsing
//! - [`common`]: shared response bodies
//!
//! # Example
//!
//! ```ignore
//! use stulink_models::stus::{ExpiryDuration, GenerateStuRequest};
//!
//! let request = GenerateStuRequest { count: 5, expires_in: "7d".into() };
//! let expires_at = ExpiryDuration::parse(&request.expires_in)?.expires_at_from(Utc::now())?;
//! ```

pub mod admins;
pub mod common;
pub mod stus;
pub mod users;

pub use stulink_auth::AdminRole;

pub use admins::{Admin, AdminLoginRequest, AdminLoginResponse, AdminResponse, CreateAdminDto};
pub use common::{ErrorResponse, MessageResponse};
pub use stus::{
    ExpiryDuration, GenerateStuRequest, MAX_STU_BATCH, StuLink, UserSession, ValidateStuRequest,
    ValidateStuResponse,
};
pub use users::{AuthResponse, LoginRequest, RegisterRequest, User, UserProfile, UserSummary};
