//! STU issuance and redemption.
//!
//! Issuance generates random tokens, retries any that collide with stored
//! tokens or with each other, and inserts the batch in a single statement.
//!
//! Redemption is a check-then-claim: the token is read to report the precise
//! failure (unknown, used, expired) and then claimed by a conditional update
//! that only succeeds while `used = false`. The claim and the session insert
//! share a transaction, so concurrent redemptions of one token produce exactly
//! one session and the losers see `409 Conflict`.

use std::collections::HashSet;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use stulink_core::AppError;
use stulink_models::{ExpiryDuration, MAX_STU_BATCH, StuLink, UserSession};

use crate::metrics::{track_stu_redemption, track_stu_tokens_issued};
use crate::utils::random::{MAX_GENERATION_ATTEMPTS, generate_stu_token};

pub const INVALID_COUNT: &str = "Count must be between 1 and 50.";
pub const INVALID_TOKEN: &str = "Invalid token.";
pub const TOKEN_ALREADY_USED: &str = "This token has already been used.";
pub const TOKEN_EXPIRED: &str = "This token has expired.";
pub const TOKEN_VALIDATED: &str = "Token validated successfully. Access granted.";

const STU_COLUMNS: &str = "id, token, expires_at, used, used_at, creator_id, created_at";

pub struct StuService;

impl StuService {
    /// Issues `count` new tokens expiring `expires_in` from now.
    #[instrument(skip(db))]
    pub async fn issue(
        db: &PgPool,
        count: i64,
        expires_in: &str,
        issuer_id: Uuid,
    ) -> Result<Vec<StuLink>, AppError> {
        Self::issue_with(db, count, expires_in, issuer_id, generate_stu_token).await
    }

    pub(crate) async fn issue_with<F>(
        db: &PgPool,
        count: i64,
        expires_in: &str,
        issuer_id: Uuid,
        generate: F,
    ) -> Result<Vec<StuLink>, AppError>
    where
        F: FnMut() -> String,
    {
        if !(1..=MAX_STU_BATCH).contains(&count) {
            return Err(AppError::bad_request(anyhow!(INVALID_COUNT)));
        }
        let expiry = ExpiryDuration::parse(expires_in)?;

        let tokens = Self::unique_tokens(db, count as usize, generate).await?;

        let mut rows = Vec::with_capacity(tokens.len());
        for token in tokens {
            rows.push((token, expiry.expires_at_from(Utc::now())?));
        }

        let mut tx = db.begin().await?;
        let links = Self::insert_links(&mut tx, &rows, issuer_id).await?;
        tx.commit().await?;

        track_stu_tokens_issued(links.len());
        tracing::info!(issuer_id = %issuer_id, count = links.len(), "STU tokens issued");

        Ok(links)
    }

    /// Writes the batch as one multi-value INSERT:
    /// `VALUES ($1, $2, $3), ($4, $5, $6), ...`.
    async fn insert_links(
        tx: &mut Transaction<'_, Postgres>,
        rows: &[(String, DateTime<Utc>)],
        issuer_id: Uuid,
    ) -> Result<Vec<StuLink>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = String::from("INSERT INTO stu_links (token, expires_at, creator_id) VALUES ");
        for i in 0..rows.len() {
            if i > 0 {
                query.push_str(", ");
            }
            let idx = i * 3;
            query.push_str(&format!("(${}, ${}, ${})", idx + 1, idx + 2, idx + 3));
        }
        query.push_str(" RETURNING ");
        query.push_str(STU_COLUMNS);

        let mut insert = sqlx::query_as::<_, StuLink>(&query);
        for (token, expires_at) in rows {
            insert = insert.bind(token).bind(expires_at).bind(issuer_id);
        }

        Ok(insert.fetch_all(&mut **tx).await?)
    }

    /// Draws candidates until `count` distinct tokens unknown to the store are
    /// collected. Each round regenerates only the rejected candidates; after
    /// [`MAX_GENERATION_ATTEMPTS`] rounds the batch fails.
    async fn unique_tokens<F>(
        db: &PgPool,
        count: usize,
        mut generate: F,
    ) -> Result<Vec<String>, AppError>
    where
        F: FnMut() -> String,
    {
        let mut accepted: Vec<String> = Vec::with_capacity(count);

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let mut seen: HashSet<String> = accepted.iter().cloned().collect();
            let candidates: Vec<String> = (accepted.len()..count)
                .map(|_| generate())
                .filter(|token| seen.insert(token.clone()))
                .collect();

            let stored: HashSet<String> = sqlx::query_scalar::<_, String>(
                "SELECT token FROM stu_links WHERE token = ANY($1)",
            )
            .bind(&candidates)
            .fetch_all(db)
            .await?
            .into_iter()
            .collect();

            accepted.extend(candidates.into_iter().filter(|token| !stored.contains(token)));

            if accepted.len() == count {
                return Ok(accepted);
            }
            tracing::warn!(missing = count - accepted.len(), "STU token collision, regenerating");
        }

        Err(AppError::internal(anyhow!(
            "Failed to generate {} unique STU tokens after {} attempts",
            count,
            MAX_GENERATION_ATTEMPTS
        )))
    }

    /// Redeems `token` for `user_id`, returning the recorded session.
    #[instrument(skip(db, token))]
    pub async fn redeem(db: &PgPool, token: &str, user_id: Uuid) -> Result<UserSession, AppError> {
        let result = Self::claim(db, token, user_id).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => match e.status.as_u16() {
                404 => "not_found",
                409 => "already_used",
                410 => "expired",
                _ => "error",
            },
        };
        track_stu_redemption(outcome);

        result
    }

    async fn claim(db: &PgPool, token: &str, user_id: Uuid) -> Result<UserSession, AppError> {
        let link = sqlx::query_as::<_, StuLink>(&format!(
            "SELECT {} FROM stu_links WHERE token = $1",
            STU_COLUMNS
        ))
        .bind(token)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!(INVALID_TOKEN)))?;

        if link.used {
            return Err(AppError::conflict(TOKEN_ALREADY_USED));
        }

        let now = Utc::now();
        if link.is_expired_at(now) {
            return Err(AppError::gone(TOKEN_EXPIRED));
        }

        let mut tx = db.begin().await?;

        // expires_at is immutable and was checked against `now` above, so a
        // zero-row update can only mean another redemption won.
        let claimed = sqlx::query(
            "UPDATE stu_links SET used = TRUE, used_at = $2 \
             WHERE id = $1 AND used = FALSE AND expires_at >= $2",
        )
        .bind(link.id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::conflict(TOKEN_ALREADY_USED));
        }

        let session = sqlx::query_as::<_, UserSession>(
            "INSERT INTO user_sessions (user_id, stu_link_id) VALUES ($1, $2) \
             RETURNING id, user_id, stu_link_id, created_at",
        )
        .bind(user_id)
        .bind(link.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if stulink_db::is_unique_violation(&e) {
                AppError::conflict(TOKEN_ALREADY_USED)
            } else {
                AppError::from(e)
            }
        })?;

        tx.commit().await?;

        tracing::info!(stu_link_id = %link.id, user_id = %user_id, "STU token redeemed");

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn insert_admin(db: &PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO admins (username, password, role) VALUES ('issuer', 'x', 'TokenGenerator') RETURNING id",
        )
        .fetch_one(db)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_issue_skips_stored_collision(pool: PgPool) {
        let issuer = insert_admin(&pool).await;
        let existing = "a".repeat(32);
        sqlx::query("INSERT INTO stu_links (token, expires_at) VALUES ($1, NOW())")
            .bind(&existing)
            .execute(&pool)
            .await
            .unwrap();

        let mut candidates = vec![existing.clone(), "b".repeat(32)].into_iter();
        let links = StuService::issue_with(&pool, 1, "1h", issuer, move || {
            candidates.next().unwrap_or_else(generate_stu_token)
        })
        .await
        .unwrap();

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].token, "b".repeat(32));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_issue_skips_in_batch_duplicates(pool: PgPool) {
        let issuer = insert_admin(&pool).await;

        let mut candidates = vec!["c".repeat(32), "c".repeat(32), "d".repeat(32)].into_iter();
        let links = StuService::issue_with(&pool, 2, "1h", issuer, move || {
            candidates.next().unwrap_or_else(generate_stu_token)
        })
        .await
        .unwrap();

        let tokens: Vec<&str> = links.iter().map(|l| l.token.as_str()).collect();
        assert_eq!(links.len(), 2);
        assert!(tokens.contains(&"c".repeat(32).as_str()));
        assert!(tokens.contains(&"d".repeat(32).as_str()));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_issue_fails_when_generator_exhausted(pool: PgPool) {
        let issuer = insert_admin(&pool).await;

        let err = StuService::issue_with(&pool, 2, "1h", issuer, || "e".repeat(32))
            .await
            .unwrap_err();

        assert!(err.is_server_error());
        let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stu_links")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_redeem_unknown_token(pool: PgPool) {
        let err = StuService::redeem(&pool, "missing", Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
        assert_eq!(err.error.to_string(), INVALID_TOKEN);
    }
}
