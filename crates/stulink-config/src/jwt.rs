use std::env;

/// Default session lifetime: 8 hours.
pub const DEFAULT_SESSION_EXPIRY_SECS: i64 = 8 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of user and admin session tokens, in seconds. Tokens are
    /// never refreshed; expiry requires a new login.
    pub session_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            session_expiry: env::var("JWT_SESSION_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|secs: &i64| *secs > 0)
                .unwrap_or(DEFAULT_SESSION_EXPIRY_SECS),
        }
    }
}
