use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use stulink_models::{
    AdminLoginRequest, AdminLoginResponse, AdminResponse, AdminRole, AuthResponse,
    CreateAdminDto, ErrorResponse, GenerateStuRequest, LoginRequest, MessageResponse,
    RegisterRequest, StuLink, UserProfile, UserSession, UserSummary, ValidateStuRequest,
    ValidateStuResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::login_admin,
        crate::modules::users::controller::get_me,
        crate::modules::stus::controller::generate_stus,
        crate::modules::stus::controller::validate_stu,
        crate::modules::admin::controller::create_admin,
        crate::modules::admin::controller::delete_admin,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserSummary,
            UserProfile,
            AdminLoginRequest,
            AdminLoginResponse,
            AdminRole,
            CreateAdminDto,
            AdminResponse,
            GenerateStuRequest,
            StuLink,
            ValidateStuRequest,
            ValidateStuResponse,
            UserSession,
            MessageResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and user/admin login"),
        (name = "Users", description = "Authenticated user endpoints"),
        (name = "STU", description = "Single-use token issuance and redemption"),
        (name = "Admins", description = "Admin account management (Superadmin only)")
    ),
    info(
        title = "STU Link API",
        version = "0.1.0",
        description = "Issues and redeems single-use access tokens, with JWT sessions for users and admins.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
