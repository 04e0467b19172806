use axum::{
    Router,
    routing::{delete, post},
};

use super::controller::{create_admin, delete_admin};
use crate::state::AppState;

pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/admins", post(create_admin))
        .route("/admins/{id}", delete(delete_admin))
}
