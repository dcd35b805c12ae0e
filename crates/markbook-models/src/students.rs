//! Student domain models and DTOs.
//!
//! A student profile links a user account (role `student`) to the school
//! registry: a unique student code, an admission number, and the class and
//! section used to scope bulk result reviews.

use crate::ids::{StudentId, UserId};
use chrono::{DateTime, Utc};
use markbook_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A student profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    /// User account backing this profile
    pub user_id: UserId,
    /// Unique short code, e.g. "STU2024001"
    pub student_code: String,
    pub admission_number: String,
    pub current_class: String,
    pub current_section: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student joined with the backing user account fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentWithUser {
    pub id: StudentId,
    pub user_id: UserId,
    pub student_code: String,
    pub admission_number: String,
    pub current_class: String,
    pub current_section: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new student.
///
/// Creates the backing user account (role `student`) and the profile in one
/// step.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 20))]
    pub student_code: String,
    #[validate(length(min = 1, max = 20))]
    pub admission_number: String,
    #[validate(length(min = 1, max = 20))]
    pub current_class: String,
    #[validate(length(min = 1, max = 10))]
    pub current_section: String,
}

/// DTO for updating an existing student profile.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 20))]
    pub current_class: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub current_section: Option<String>,
}

/// Query parameters for filtering students.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct StudentFilterParams {
    /// Filter by class
    pub class: Option<String>,
    /// Filter by section
    pub section: Option<String>,
    /// Pagination parameters
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing students.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<StudentWithUser>,
    pub meta: PaginationMeta,
}
