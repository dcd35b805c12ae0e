//! Subject domain models and DTOs.

use crate::ids::SubjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A subject taught at the school, referenced by exams.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    /// Unique short code, e.g. "MATH101"
    pub code: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new subject.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_subject_dto_validation() {
        let valid = CreateSubjectDto {
            name: "Mathematics".to_string(),
            code: "MATH101".to_string(),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let empty_code = CreateSubjectDto {
            name: "Mathematics".to_string(),
            code: "".to_string(),
            description: None,
        };
        assert!(empty_code.validate().is_err());
    }
}
