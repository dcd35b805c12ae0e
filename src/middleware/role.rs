//! Role-based authorization for Axum.
//!
//! Two approaches are provided, both dispatching on the single role claim:
//!
//! 1. Layer-based middleware (`require_admin`, `require_teacher`) for
//!    gating a whole router nest
//! 2. Extractor-based gates (`RequireAdmin`, `RequireTeacher`) for
//!    per-handler checks
//!
//! Roles are hierarchical: admin > teacher > student. "Teacher access" means
//! teacher or admin.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use markbook_core::AppError;
use markbook_models::users::UserRole;

/// Middleware function that checks the authenticated user's role against an
/// allowed set.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/students", post(create_student))
///     .layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: Vec<UserRole>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !allowed_roles.contains(&auth_user.role()) {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Access denied. Required roles: {:?}, but user has role: {}",
            allowed_roles,
            auth_user.role()
        )));
    }

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Admin-only middleware layer.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, vec![UserRole::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Teacher-level middleware layer (admin and teacher allowed).
pub async fn require_teacher(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(
        State(state),
        req,
        next,
        vec![UserRole::Admin, UserRole::Teacher],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Extractor gate for admin-only handlers.
///
/// ```rust,ignore
/// pub async fn review_results(
///     _admin: RequireAdmin,
///     auth_user: AuthUser,
/// ) -> Result<Json<Response>, AppError> {
///     // Only admins reach this point
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if auth_user.role() != UserRole::Admin {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Access denied. Administrator privileges required."
            )));
        }

        Ok(RequireAdmin)
    }
}

/// Extractor gate for teacher-level handlers (admin or teacher).
#[derive(Debug, Clone)]
pub struct RequireTeacher;

impl FromRequestParts<AppState> for RequireTeacher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if auth_user.role() != UserRole::Admin && auth_user.role() != UserRole::Teacher {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Access denied. Teacher privileges required."
            )));
        }

        Ok(RequireTeacher)
    }
}

/// Get the hierarchy level of a role (higher number = more privileges).
pub fn role_hierarchy_level(role: &UserRole) -> u8 {
    match role {
        UserRole::Admin => 2,
        UserRole::Teacher => 1,
        UserRole::Student => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert_eq!(role_hierarchy_level(&UserRole::Admin), 2);
        assert_eq!(role_hierarchy_level(&UserRole::Teacher), 1);
        assert_eq!(role_hierarchy_level(&UserRole::Student), 0);
    }

    #[test]
    fn test_admin_outranks_teacher() {
        assert!(
            role_hierarchy_level(&UserRole::Admin) > role_hierarchy_level(&UserRole::Teacher)
        );
    }
}
