//! Role-based authorization gate.
//!
//! [`authorize`] decides whether an authenticated admin may perform an
//! operation restricted to a set of roles. It performs no I/O; confirming the
//! admin still exists is the caller's job and must happen first.

use stulink_core::AppError;

use crate::claims::AdminClaims;
use crate::roles::AdminRole;

pub const FORBIDDEN_MESSAGE: &str = "Forbidden: You do not have the required role.";

/// Returns true if `role` satisfies `required`.
///
/// Superadmin satisfies every requirement, including an empty one. Any other
/// role must appear in `required`.
pub fn role_satisfies(role: AdminRole, required: &[AdminRole]) -> bool {
    role.bypasses_role_checks() || required.contains(&role)
}

/// Grants or denies access for an authenticated admin.
///
/// # Errors
///
/// Returns a 403 with [`FORBIDDEN_MESSAGE`] when the admin's role is not in
/// `required` and is not Superadmin.
pub fn authorize(claims: &AdminClaims, required: &[AdminRole]) -> Result<(), AppError> {
    if role_satisfies(claims.role, required) {
        Ok(())
    } else {
        Err(AppError::forbidden(FORBIDDEN_MESSAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn admin(role: AdminRole) -> AdminClaims {
        AdminClaims {
            admin_id: Uuid::new_v4(),
            role,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_superadmin_passes_any_requirement() {
        let claims = admin(AdminRole::Superadmin);
        assert!(authorize(&claims, &[]).is_ok());
        assert!(authorize(&claims, &[AdminRole::TokenGenerator]).is_ok());
        assert!(authorize(&claims, &[AdminRole::Admin]).is_ok());
    }

    #[test]
    fn test_listed_role_passes() {
        let required = [AdminRole::TokenGenerator, AdminRole::Admin];
        assert!(authorize(&admin(AdminRole::TokenGenerator), &required).is_ok());
        assert!(authorize(&admin(AdminRole::Admin), &required).is_ok());
    }

    #[test]
    fn test_unlisted_role_is_forbidden() {
        let err = authorize(&admin(AdminRole::Admin), &[AdminRole::Superadmin]).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
        assert_eq!(err.error.to_string(), FORBIDDEN_MESSAGE);
    }

    #[test]
    fn test_empty_requirement_denies_non_superadmin() {
        assert!(authorize(&admin(AdminRole::Admin), &[]).is_err());
        assert!(authorize(&admin(AdminRole::TokenGenerator), &[]).is_err());
    }

    #[test]
    fn test_role_satisfies_matrix() {
        for role in AdminRole::ALL {
            for required in AdminRole::ALL {
                let expected = role == AdminRole::Superadmin || role == required;
                assert_eq!(role_satisfies(role, &[required]), expected, "{role} vs {required}");
            }
        }
    }
}
