use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::state::AppState;
use crate::utils::jwt::verify_token;
use markbook_core::AppError;
use markbook_models::auth::Claims;
use markbook_models::ids::UserId;
use markbook_models::users::UserRole;

/// Extractor that validates the JWT and provides the authenticated user's
/// claims. The claims carry the single explicit role used for every
/// authorization decision.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Get the user ID from the token subject.
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid user ID in token")))
    }

    /// Get the user's role.
    pub fn role(&self) -> UserRole {
        self.0.role
    }

    /// Get the user's email.
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing authorization header"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_claims(role: UserRole) -> Claims {
        Claims {
            sub: UserId::new().to_string(),
            email: "test@example.com".to_string(),
            role,
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_user_id_parses_subject() {
        let claims = create_test_claims(UserRole::Teacher);
        let expected: UserId = claims.sub.parse().unwrap();
        let auth_user = AuthUser(claims);
        assert_eq!(auth_user.user_id().unwrap(), expected);
    }

    #[test]
    fn test_user_id_rejects_garbage_subject() {
        let mut claims = create_test_claims(UserRole::Teacher);
        claims.sub = "not-a-uuid".to_string();
        let auth_user = AuthUser(claims);
        assert!(auth_user.user_id().is_err());
    }

    #[test]
    fn test_role_accessor() {
        let auth_user = AuthUser(create_test_claims(UserRole::Admin));
        assert_eq!(auth_user.role(), UserRole::Admin);
    }
}
