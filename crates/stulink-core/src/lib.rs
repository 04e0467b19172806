//! # Stulink Core
//!
//! Foundational types shared by every Stulink crate:
//!
//! - [`errors`]: the application error type and its HTTP mapping
//! - [`password`]: bcrypt hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use stulink_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("correct horse battery staple")?;
//! if !verify_password("guess", &hash)? {
//!     return Err(AppError::unauthorized("Invalid credentials."));
//! }
//! ```

pub mod errors;
pub mod password;

pub use errors::AppError;
pub use password::{hash_password, verify_missing_account, verify_password};
