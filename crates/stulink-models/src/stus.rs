//! Single-use token (STU) models and DTOs.
//!
//! An STU is issued in batches by an admin and redeemed exactly once by a
//! user. Redemption flips `used` and records a [`UserSession`] in the same
//! transaction.

use anyhow::anyhow;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use stulink_core::AppError;

/// Largest batch a single generate request may ask for.
pub const MAX_STU_BATCH: i64 = 50;

pub const DEFAULT_EXPIRES_IN: &str = "1h";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StuLink {
    pub id: Uuid,
    #[schema(example = "3f9a0c1d2e4b5a6978c0d1e2f3a4b5c6")]
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
    pub creator_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl StuLink {
    /// Expired strictly after `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Durable record of a redemption. At most one exists per STU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stu_link_id: Uuid,
    pub created_at: DateTime<Utc>,
}

fn default_count() -> i64 {
    1
}

fn default_expires_in() -> String {
    DEFAULT_EXPIRES_IN.to_string()
}

/// Batch issuance request. Both fields are optional.
///
/// `count` is range-checked by the issuer rather than by `validator` so an
/// out-of-range batch is a plain 400.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GenerateStuRequest {
    #[serde(default = "default_count")]
    #[schema(example = 5, minimum = 1, maximum = 50)]
    pub count: i64,
    #[serde(default = "default_expires_in", alias = "expiresIn")]
    #[schema(example = "7d")]
    pub expires_in: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ValidateStuRequest {
    #[validate(length(min = 1, message = "Token is required."))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateStuResponse {
    #[schema(example = "Token validated successfully. Access granted.")]
    pub message: String,
    pub session: UserSession,
}

/// Relative expiry horizon parsed from strings such as `"30m"`, `"1h"` or
/// `"7d"`.
///
/// The unit is the last character (case-insensitive). An unrecognized unit
/// yields one hour regardless of the magnitude. For a recognized unit the
/// magnitude must be a positive integer that fits the timestamp range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryDuration(TimeDelta);

impl ExpiryDuration {
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let input = input.trim();
        let Some((split, unit)) = input.char_indices().next_back() else {
            return Ok(Self::fallback());
        };

        let from_magnitude: fn(i64) -> Option<TimeDelta> = match unit.to_ascii_lowercase() {
            'm' => TimeDelta::try_minutes,
            'h' => TimeDelta::try_hours,
            'd' => TimeDelta::try_days,
            _ => return Ok(Self::fallback()),
        };

        let magnitude: i64 = input[..split]
            .parse()
            .map_err(|_| invalid_expiry(input))?;
        if magnitude <= 0 {
            return Err(invalid_expiry(input));
        }

        from_magnitude(magnitude)
            .map(Self)
            .ok_or_else(|| invalid_expiry(input))
    }

    fn fallback() -> Self {
        Self(TimeDelta::hours(1))
    }

    /// Absolute expiry for a token generated at `now`.
    pub fn expires_at_from(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, AppError> {
        now.checked_add_signed(self.0)
            .ok_or_else(|| AppError::bad_request(anyhow!("Expiry is out of range.")))
    }
}

fn invalid_expiry(input: &str) -> AppError {
    AppError::bad_request(anyhow!(
        "Invalid expires_in value '{}'. Use a positive number followed by m, h or d.",
        input
    ))
}
