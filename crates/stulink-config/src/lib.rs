//! # Stulink Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: session credential signing and lifetime
//! - [`cors`]: allowed browser origins
//! - [`rate_limit`]: per-client request quota for `/api`
//! - [`server`]: bind address
//!
//! # Example
//!
//! ```ignore
//! use stulink_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
