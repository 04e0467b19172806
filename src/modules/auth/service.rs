use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use stulink_auth::{create_admin_token, create_user_token};
use stulink_config::JwtConfig;
use stulink_core::{AppError, hash_password, verify_missing_account, verify_password};
use stulink_db::is_unique_violation;
use stulink_models::{
    AdminLoginRequest, AdminLoginResponse, AuthResponse, LoginRequest, RegisterRequest, User,
    UserSummary,
};

use crate::metrics::{track_login, track_user_registered};
use crate::modules::admin::service::AdminService;
use crate::modules::users::service::{USER_COLUMNS, UserService};
use crate::utils::random::{MAX_GENERATION_ATTEMPTS, generate_referral_code};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";
pub const DUPLICATE_USER: &str = "Email or username already exists.";
pub const UNVERIFIED_USER: &str = "User account is not verified.";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn register_user(
        db: &PgPool,
        dto: RegisterRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let email = dto.email.trim().to_lowercase();

        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 OR username = $2)",
        )
        .bind(&email)
        .bind(&dto.username)
        .fetch_one(db)
        .await?;

        if taken {
            return Err(AppError::conflict(DUPLICATE_USER));
        }

        let referred_by_id = match dto.referred_by_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Self::find_referrer(db, code).await?,
            _ => None,
        };

        let referral_code = Self::unique_referral_code(db).await?;
        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, username, email, password, referral_code, is_verified, referred_by_id) \
             VALUES ($1, $2, $3, $4, $5, TRUE, $6) \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&dto.name)
        .bind(&dto.username)
        .bind(&email)
        .bind(&hashed_password)
        .bind(&referral_code)
        .bind(referred_by_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict(DUPLICATE_USER)
            } else {
                AppError::from(e)
            }
        })?;

        let token = create_user_token(user.id, jwt_config)?;
        track_user_registered();
        tracing::info!(user_id = %user.id, referred = referred_by_id.is_some(), "User registered");

        Ok(AuthResponse {
            message: format!("Account for {} created successfully!", user.username),
            token,
            user: UserSummary::from(&user),
        })
    }

    #[instrument(skip(db, dto, jwt_config), fields(identifier = %dto.email_or_username))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AuthResponse, AppError> {
        let Some(user) = UserService::find_by_email_or_username(db, &dto.email_or_username).await?
        else {
            verify_missing_account(&dto.password);
            track_login("user", "invalid_credentials");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &user.password)? {
            track_login("user", "invalid_credentials");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if !user.is_verified {
            track_login("user", "unverified");
            return Err(AppError::forbidden(UNVERIFIED_USER));
        }

        let token = create_user_token(user.id, jwt_config)?;
        track_login("user", "success");

        Ok(AuthResponse {
            message: format!("Welcome back, {}!", user.username),
            token,
            user: UserSummary::from(&user),
        })
    }

    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login_admin(
        db: &PgPool,
        dto: AdminLoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AdminLoginResponse, AppError> {
        let admin = match AdminService::find_by_username(db, &dto.username).await? {
            Some(admin) if verify_password(&dto.password, &admin.password)? => admin,
            found => {
                if found.is_none() {
                    verify_missing_account(&dto.password);
                }
                track_login("admin", "invalid_credentials");
                return Err(AppError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        let token = create_admin_token(admin.id, admin.role, jwt_config)?;
        track_login("admin", "success");

        Ok(AdminLoginResponse {
            message: format!("Admin {} logged in successfully!", admin.username),
            token,
        })
    }

    /// Unknown codes are ignored rather than rejected.
    async fn find_referrer(db: &PgPool, code: &str) -> Result<Option<Uuid>, AppError> {
        let referrer = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE referral_code = $1")
            .bind(code)
            .fetch_optional(db)
            .await?;

        if referrer.is_none() {
            tracing::debug!("Ignoring unknown referral code");
        }

        Ok(referrer)
    }

    async fn unique_referral_code(db: &PgPool) -> Result<String, AppError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let code = generate_referral_code();
            let taken: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE referral_code = $1)")
                    .bind(&code)
                    .fetch_one(db)
                    .await?;
            if !taken {
                return Ok(code);
            }
        }

        Err(AppError::internal(anyhow!(
            "Failed to generate a unique referral code after {} attempts",
            MAX_GENERATION_ATTEMPTS
        )))
    }
}
