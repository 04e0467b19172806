use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use stulink_core::{AppError, hash_password};
use stulink_db::is_unique_violation;
use stulink_models::{Admin, AdminResponse, CreateAdminDto};

use crate::metrics::track_admin_change;

pub const DUPLICATE_ADMIN: &str = "Admin username already exists.";
pub const SELF_DELETE: &str = "You cannot delete your own account.";
pub const ADMIN_NOT_FOUND: &str = "Admin not found.";

const ADMIN_COLUMNS: &str = "id, username, password, role, created_at";

pub struct AdminService;

impl AdminService {
    #[instrument(skip(db))]
    pub async fn exists(db: &PgPool, admin_id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM admins WHERE id = $1)")
            .bind(admin_id)
            .fetch_one(db)
            .await?;

        Ok(exists)
    }

    #[instrument(skip(db))]
    pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {} FROM admins WHERE username = $1",
            ADMIN_COLUMNS
        ))
        .bind(username)
        .fetch_optional(db)
        .await?;

        Ok(admin)
    }

    #[instrument(skip(db, dto), fields(username = %dto.username, role = %dto.role))]
    pub async fn create_admin(db: &PgPool, dto: CreateAdminDto) -> Result<AdminResponse, AppError> {
        if Self::find_by_username(db, &dto.username).await?.is_some() {
            return Err(AppError::conflict(DUPLICATE_ADMIN));
        }

        let hashed_password = hash_password(&dto.password)?;

        let admin = sqlx::query_as::<_, Admin>(&format!(
            "INSERT INTO admins (username, password, role) VALUES ($1, $2, $3) RETURNING {}",
            ADMIN_COLUMNS
        ))
        .bind(&dto.username)
        .bind(&hashed_password)
        .bind(dto.role)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(DUPLICATE_ADMIN)
            } else {
                AppError::from(e)
            }
        })?;

        track_admin_change("create");
        tracing::info!(admin_id = %admin.id, "Admin created");

        Ok(AdminResponse::from(admin))
    }

    /// Deletes `target_id`. An admin may never delete their own account.
    #[instrument(skip(db))]
    pub async fn delete_admin(db: &PgPool, caller_id: Uuid, target_id: Uuid) -> Result<(), AppError> {
        if caller_id == target_id {
            return Err(AppError::bad_request(anyhow!(SELF_DELETE)));
        }

        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(target_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!(ADMIN_NOT_FOUND)));
        }

        track_admin_change("delete");
        tracing::info!(admin_id = %target_id, "Admin deleted");

        Ok(())
    }
}
