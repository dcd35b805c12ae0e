//! Auth data models and DTOs.
//!
//! Re-exports the shared auth models and defines the credential row used
//! only by the login query.

pub use markbook_models::auth::{Claims, LoginRequest, LoginResponse};

use markbook_models::ids::UserId;
use markbook_models::users::UserRole;
use sqlx::FromRow;

/// Credential row fetched during login; never serialized.
#[derive(Debug, FromRow)]
pub struct UserCredentials {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}
