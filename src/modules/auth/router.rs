use axum::{Router, routing::post};

use super::controller::{login_admin, login_user, register_user};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/admin/login", post(login_admin))
}
