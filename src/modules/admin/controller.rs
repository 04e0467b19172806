use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::instrument;
use uuid::Uuid;

use stulink_core::AppError;
use stulink_models::{AdminResponse, CreateAdminDto, ErrorResponse, MessageResponse};

use super::service::AdminService;
use crate::middleware::role::RequireSuperadmin;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create an admin account (Superadmin only)
#[utoipa::path(
    post,
    path = "/api/admin/admins",
    request_body = CreateAdminDto,
    responses(
        (status = 201, description = "Admin created", body = AdminResponse),
        (status = 400, description = "Missing fields or invalid role", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Superadmin role required", body = ErrorResponse),
        (status = 409, description = "Admin username already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admins"
)]
#[instrument(skip(state, dto), fields(caller_id = %admin.admin_id()))]
pub async fn create_admin(
    State(state): State<AppState>,
    RequireSuperadmin(admin): RequireSuperadmin,
    ValidatedJson(dto): ValidatedJson<CreateAdminDto>,
) -> Result<(StatusCode, Json<AdminResponse>), AppError> {
    let created = AdminService::create_admin(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete an admin account (Superadmin only, never your own)
#[utoipa::path(
    delete,
    path = "/api/admin/admins/{id}",
    params(
        ("id" = Uuid, Path, description = "Admin ID")
    ),
    responses(
        (status = 200, description = "Admin deleted", body = MessageResponse),
        (status = 400, description = "Attempted to delete own account", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Superadmin role required", body = ErrorResponse),
        (status = 404, description = "Admin not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admins"
)]
#[instrument(skip(state), fields(caller_id = %admin.admin_id()))]
pub async fn delete_admin(
    State(state): State<AppState>,
    RequireSuperadmin(admin): RequireSuperadmin,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    AdminService::delete_admin(&state.db, admin.admin_id(), id).await?;
    Ok(Json(MessageResponse::new("Admin account deleted successfully.")))
}
