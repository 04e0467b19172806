use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware, routing::get};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::rate_limit::{RateLimitState, rate_limit_middleware};
use crate::modules::admin::router::init_admin_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::stus::router::init_stus_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

async fn health() -> &'static str {
    "OK"
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let mut api = Router::new()
        .nest("/auth", init_auth_router())
        .nest("/users", init_users_router())
        .nest("/stus", init_stus_router())
        .nest("/admin", init_admin_router());

    if state.rate_limit_config.enabled {
        let limiter = RateLimitState::new(&state.rate_limit_config);
        api = api.layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));
    }

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
