use std::sync::OnceLock;

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

fn dummy_hash() -> Option<&'static str> {
    DUMMY_HASH
        .get_or_init(|| hash("stulink-missing-account", DEFAULT_COST).ok())
        .as_deref()
}

/// Runs a bcrypt verification at the same cost as a real one and discards the
/// result. Login paths call this when the account does not exist so that a
/// missing account and a wrong password take the same time.
pub fn verify_missing_account(password: &str) {
    if let Some(dummy) = dummy_hash() {
        let _ = verify(password, dummy);
    }
}
