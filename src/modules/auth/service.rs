use sqlx::PgPool;
use tracing::instrument;

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{LoginRequest, LoginResponse, UserCredentials};
use crate::utils::jwt::create_access_token;
use markbook_core::{AppError, verify_password};
use markbook_models::users::User;

pub struct AuthService;

impl AuthService {
    /// Verify credentials and issue an access token.
    ///
    /// An unknown email and a wrong password produce the same error so the
    /// response does not reveal which accounts exist.
    #[instrument(skip(db, jwt_config, dto))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, email, password, role FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Invalid email or password")))?;

        if !verify_password(&dto.password, &credentials.password)? {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid email or password"
            )));
        }

        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, first_name, last_name, email, role, phone, address, created_at, updated_at
               FROM users WHERE id = $1"#,
        )
        .bind(credentials.id)
        .fetch_one(db)
        .await?;

        let access_token = create_access_token(
            credentials.id,
            &credentials.email,
            credentials.role,
            jwt_config,
        )?;

        Ok(LoginResponse { access_token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use markbook_core::hash_password;
    use markbook_models::users::UserRole;

    async fn create_user(pool: &PgPool, email: &str, password: &str, role: UserRole) {
        let hashed = hash_password(password).unwrap();
        sqlx::query(
            r#"INSERT INTO users (first_name, last_name, email, password, role)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind("Test")
        .bind("User")
        .bind(email)
        .bind(&hashed)
        .bind(role)
        .execute(pool)
        .await
        .unwrap();
    }

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_success(pool: PgPool) {
        create_user(&pool, "teacher@example.com", "password123", UserRole::Teacher).await;

        let response = AuthService::login(
            &pool,
            &test_jwt_config(),
            LoginRequest {
                email: "teacher@example.com".to_string(),
                password: "password123".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(!response.access_token.is_empty());
        assert_eq!(response.user.email, "teacher@example.com");
        assert_eq!(response.user.role, UserRole::Teacher);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_wrong_password(pool: PgPool) {
        create_user(&pool, "teacher@example.com", "password123", UserRole::Teacher).await;

        let err = AuthService::login(
            &pool,
            &test_jwt_config(),
            LoginRequest {
                email: "teacher@example.com".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_unknown_email(pool: PgPool) {
        let err = AuthService::login(
            &pool,
            &test_jwt_config(),
            LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "password123".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
