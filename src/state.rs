use sqlx::PgPool;

use stulink_config::{CorsConfig, JwtConfig, RateLimitConfig};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
}

pub fn init_app_state(db: PgPool) -> AppState {
    AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
    }
}
