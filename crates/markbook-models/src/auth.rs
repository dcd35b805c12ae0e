//! Authentication models: JWT claims and login DTOs.

use crate::users::{User, UserRole};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// JWT claims carried by every access token.
///
/// `role` is the single source of truth for authorization decisions; profile
/// records (student/teacher) are looked up separately when ownership checks
/// need them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

/// Login request body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Login response with the issued access token.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "teacher@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = LoginRequest {
            email: "nope".to_string(),
            password: "secret".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_password = LoginRequest {
            email: "teacher@example.com".to_string(),
            password: "".to_string(),
        };
        assert!(empty_password.validate().is_err());
    }

    #[test]
    fn test_claims_roundtrip() {
        let claims = Claims {
            sub: "2f4e98a2-9a8d-4ca5-8c5a-000000000001".to_string(),
            email: "teacher@example.com".to_string(),
            role: UserRole::Teacher,
            exp: 9999999999,
            iat: 1234567890,
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(json.contains(r#""role":"teacher""#));
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back.role, UserRole::Teacher);
    }
}
