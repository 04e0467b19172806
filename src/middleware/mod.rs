//! Extractors and middleware for cross-cutting request concerns.
//!
//! - [`auth`]: session extractors for users and admins
//! - [`role`]: role-gated admin extractors built on the authorization gate
//! - [`rate_limit`]: per-client request quota for `/api`
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. The token is verified for the expected principal kind
//! 3. The principal is looked up; a deleted account is rejected with 401
//! 4. For admin routes, the role gate runs and rejects with 403
//! 5. The handler executes

pub mod auth;
pub mod rate_limit;
pub mod role;
