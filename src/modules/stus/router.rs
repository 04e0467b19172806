use axum::{Router, routing::post};

use super::controller::{generate_stus, validate_stu};
use crate::state::AppState;

pub fn init_stus_router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate_stus))
        .route("/validate", post(validate_stu))
}
