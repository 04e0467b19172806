//! # Stulink CLI
//!
//! Administrative helpers used by the `stulink-cli` binary.
//!
//! Admin accounts are otherwise only created by an existing Superadmin over
//! the API, so a fresh deployment needs [`create_superadmin`] to get its
//! first one.
//!
//! ## Usage
//!
//! ```ignore
//! use stulink_cli::create_superadmin;
//!
//! let admin = create_superadmin(&pool, "root", "correct horse battery staple").await?;
//! ```

use anyhow::{Context, bail};
use sqlx::PgPool;

use stulink_core::hash_password;
use stulink_models::{Admin, AdminRole};

/// Inserts an admin with the Superadmin role.
///
/// Fails if `username` is empty or already taken.
pub async fn create_superadmin(
    db: &PgPool,
    username: &str,
    password: &str,
) -> anyhow::Result<Admin> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        bail!("Username and password are required");
    }

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM admins WHERE username = $1)")
            .bind(username)
            .fetch_one(db)
            .await
            .context("Failed to check for an existing admin")?;
    if exists {
        bail!("Admin username '{}' already exists", username);
    }

    let hashed_password = hash_password(password).map_err(|e| e.error)?;

    let admin = sqlx::query_as::<_, Admin>(
        r#"
        INSERT INTO admins (username, password, role)
        VALUES ($1, $2, $3)
        RETURNING id, username, password, role, created_at
        "#,
    )
    .bind(username)
    .bind(&hashed_password)
    .bind(AdminRole::Superadmin)
    .fetch_one(db)
    .await
    .context("Failed to insert admin")?;

    Ok(admin)
}
