//! Random identifiers drawn from the thread-local CSPRNG.

use rand::RngCore;

/// Bytes of entropy in an STU token (rendered as 32 hex chars).
pub const STU_TOKEN_BYTES: usize = 16;

/// Bytes of entropy in a referral code (rendered as 16 hex chars).
pub const REFERRAL_CODE_BYTES: usize = 8;

/// Upper bound on regeneration rounds when a random value collides with an
/// existing one.
pub const MAX_GENERATION_ATTEMPTS: usize = 16;

/// Returns `len` random bytes as lowercase hex.
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn generate_stu_token() -> String {
    random_hex(STU_TOKEN_BYTES)
}

pub fn generate_referral_code() -> String {
    random_hex(REFERRAL_CODE_BYTES)
}
