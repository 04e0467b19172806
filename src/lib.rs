//! # STU Link API
//!
//! A REST API built with Rust, Axum and PostgreSQL that issues and redeems
//! single-use tokens (STUs).
//!
//! ## Overview
//!
//! - **Users** register, log in by email or username, and redeem STUs.
//! - **Admins** log in separately and, depending on role, issue STUs or
//!   manage other admins.
//! - Every redemption is recorded as a session tying the user to the token.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Session extractors, role guards, rate limiting
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Registration, user login, admin login
//! │   ├── users/       # Authenticated profile
//! │   ├── stus/        # Token issuance and redemption
//! │   └── admin/       # Admin account management
//! └── utils/           # Random token generation
//! ```
//!
//! Each feature module has a `controller.rs` (handlers), `service.rs`
//! (business logic against `&PgPool`) and `router.rs`. Shared types live in
//! the workspace crates re-exported below.
//!
//! ## Roles
//!
//! | Role | Issue STUs | Manage admins |
//! |------|------------|---------------|
//! | Superadmin | yes | yes |
//! | Admin | yes | no |
//! | TokenGenerator | yes | no |
//!
//! Superadmin passes every role check. The first Superadmin is created with
//! the CLI:
//!
//! ```bash
//! cargo run --bin stulink-cli -- create-superadmin
//! ```
//!
//! ## Token lifecycle
//!
//! A STU is unused until redeemed once. Redeeming an unknown token is
//! `404`, a used one `409`, an expired one `410`. Expiry is checked lazily
//! at redemption; nothing sweeps old tokens.
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:5000/swagger-ui`
//! - Scalar: `http://localhost:5000/scalar`

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

pub use stulink_auth;
pub use stulink_config;
pub use stulink_core;
pub use stulink_db;
pub use stulink_models;
