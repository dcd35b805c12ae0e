//! Exam domain models and DTOs.
//!
//! An exam is an assessable event owned by a subject. Its `total_marks` and
//! `passing_marks` thresholds drive grade computation for every result that
//! references it.

use crate::ids::{ExamId, SubjectId};
use chrono::{DateTime, NaiveDate, Utc};
use markbook_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Kind of assessable event.
///
/// Stored in Postgres as the `exam_type` enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "exam_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExamType {
    UnitTest,
    MidTerm,
    Final,
    Practical,
    Assignment,
    Project,
}

impl ExamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExamType::UnitTest => "unit_test",
            ExamType::MidTerm => "mid_term",
            ExamType::Final => "final",
            ExamType::Practical => "practical",
            ExamType::Assignment => "assignment",
            ExamType::Project => "project",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An exam.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exam {
    pub id: ExamId,
    pub name: String,
    pub exam_type: ExamType,
    pub subject_id: SubjectId,
    pub total_marks: i32,
    pub passing_marks: i32,
    pub exam_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Exam joined with its subject name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamWithSubject {
    pub id: ExamId,
    pub name: String,
    pub exam_type: ExamType,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub total_marks: i32,
    pub passing_marks: i32,
    pub exam_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new exam.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateExamDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub exam_type: ExamType,
    pub subject_id: SubjectId,
    /// Must be at least 1; a zero total cannot produce a grade
    #[validate(range(min = 1))]
    pub total_marks: i32,
    #[validate(range(min = 0))]
    pub passing_marks: i32,
    pub exam_date: NaiveDate,
}

/// DTO for updating an existing exam.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateExamDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub exam_type: Option<ExamType>,
    #[validate(range(min = 1))]
    pub total_marks: Option<i32>,
    #[validate(range(min = 0))]
    pub passing_marks: Option<i32>,
    pub exam_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

/// Query parameters for filtering exams.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ExamFilterParams {
    pub subject_id: Option<SubjectId>,
    pub exam_type: Option<ExamType>,
    pub is_active: Option<bool>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing exams.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedExamsResponse {
    pub data: Vec<ExamWithSubject>,
    pub meta: PaginationMeta,
}
