//! Academic year domain models and DTOs.
//!
//! At most one academic year is current at any time; activating one clears
//! the flag on every other year inside a single transaction.

use crate::ids::AcademicYearId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// An academic year, e.g. "2024-25".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AcademicYear {
    pub id: AcademicYearId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new academic year.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAcademicYearDto {
    #[validate(length(min = 1, max = 20))]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// When true, this year becomes current and all others are cleared
    #[serde(default)]
    pub is_current: bool,
}

/// DTO for updating an existing academic year.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAcademicYearDto {
    #[validate(length(min = 1, max = 20))]
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_academic_year_dto_validation() {
        let valid = CreateAcademicYearDto {
            name: "2024-25".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            is_current: false,
        };
        assert!(valid.validate().is_ok());

        let long_name = CreateAcademicYearDto {
            name: "x".repeat(21),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            is_current: false,
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_create_academic_year_dto_is_current_defaults_false() {
        let json = r#"{"name":"2024-25","start_date":"2024-06-01","end_date":"2025-05-31"}"#;
        let dto: CreateAcademicYearDto = serde_json::from_str(json).unwrap();
        assert!(!dto.is_current);
    }
}
