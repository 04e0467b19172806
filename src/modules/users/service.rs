use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use stulink_core::AppError;
use stulink_models::User;

pub(crate) const USER_COLUMNS: &str = "id, name, username, email, password, referral_code, \
     is_verified, referred_by_id, registered_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    /// Looks up a user by email (case-insensitive) or exact username.
    #[instrument(skip(db))]
    pub async fn find_by_email_or_username(
        db: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1 OR username = $2 \
             ORDER BY (email = $1) DESC LIMIT 1",
            USER_COLUMNS
        ))
        .bind(identifier.trim().to_lowercase())
        .bind(identifier)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }
}
