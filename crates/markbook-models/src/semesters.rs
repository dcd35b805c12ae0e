//! Semester domain models and DTOs.
//!
//! Semesters subdivide academic years. The `is_current` flag is globally
//! exclusive across the whole semesters table, not per year.

use crate::ids::{AcademicYearId, SemesterId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A semester within an academic year.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Semester {
    pub id: SemesterId,
    pub academic_year_id: AcademicYearId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Semester joined with its academic year name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SemesterWithYear {
    pub id: SemesterId,
    pub academic_year_id: AcademicYearId,
    pub academic_year_name: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new semester.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSemesterDto {
    pub academic_year_id: AcademicYearId,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// When true, this semester becomes current and all others are cleared
    #[serde(default)]
    pub is_current: bool,
}

/// DTO for updating an existing semester.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSemesterDto {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: Option<bool>,
}
