//! Result domain models, grade computation, and the status taxonomy.
//!
//! A result records one student's marks for one exam. The letter grade is
//! derived from the owning exam's thresholds on every write and is never
//! accepted from a caller. Status moves only through the workflow service's
//! bulk transitions: `draft → pending_approval → approved | rejected`.

use crate::ids::{ExamId, ResultId, StudentId, UserId};
use chrono::{DateTime, Utc};
use markbook_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Letter grade bands.
///
/// Stored in Postgres as the `grade` enum type with the literal band labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "grade")]
pub enum Grade {
    #[sqlx(rename = "A+")]
    #[serde(rename = "A+")]
    APlus,
    #[sqlx(rename = "A")]
    #[serde(rename = "A")]
    A,
    #[sqlx(rename = "B+")]
    #[serde(rename = "B+")]
    BPlus,
    #[sqlx(rename = "B")]
    #[serde(rename = "B")]
    B,
    #[sqlx(rename = "C+")]
    #[serde(rename = "C+")]
    CPlus,
    #[sqlx(rename = "C")]
    #[serde(rename = "C")]
    C,
    #[sqlx(rename = "D")]
    #[serde(rename = "D")]
    D,
    #[sqlx(rename = "F")]
    #[serde(rename = "F")]
    F,
}

/// Error from grade computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeError {
    /// `total_marks` was zero or negative, so no percentage can be formed.
    InvalidTotalMarks,
}

impl fmt::Display for GradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeError::InvalidTotalMarks => {
                f.write_str("exam total_marks must be greater than zero")
            }
        }
    }
}

impl std::error::Error for GradeError {}

impl Grade {
    /// Compute the letter grade for `marks_obtained` against an exam's
    /// thresholds.
    ///
    /// Bands are evaluated highest-first; a percentage exactly on a boundary
    /// takes the higher band. The D band compares the percentage value
    /// against the raw `passing_marks` integer, not against a percentage
    /// form of it.
    pub fn from_marks(
        marks_obtained: i32,
        total_marks: i32,
        passing_marks: i32,
    ) -> Result<Grade, GradeError> {
        if total_marks <= 0 {
            return Err(GradeError::InvalidTotalMarks);
        }

        let percentage = (marks_obtained as f64 / total_marks as f64) * 100.0;

        let grade = if percentage >= 90.0 {
            Grade::APlus
        } else if percentage >= 80.0 {
            Grade::A
        } else if percentage >= 70.0 {
            Grade::BPlus
        } else if percentage >= 60.0 {
            Grade::B
        } else if percentage >= 50.0 {
            Grade::CPlus
        } else if percentage >= 40.0 {
            Grade::C
        } else if percentage >= passing_marks as f64 {
            Grade::D
        } else {
            Grade::F
        };

        Ok(grade)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a result.
///
/// Stored in Postgres as the `result_status` enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "result_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Draft,
    /// Reserved label; no transition produces it.
    Published,
    PendingApproval,
    Approved,
    Rejected,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Draft => "draft",
            ResultStatus::Published => "published",
            ResultStatus::PendingApproval => "pending_approval",
            ResultStatus::Approved => "approved",
            ResultStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action requested by an admin reviewing a pending batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    /// Parse the wire value. Anything other than `approve`/`reject` is
    /// rejected by the workflow with an invalid-action error.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "approve" => Some(ReviewAction::Approve),
            "reject" => Some(ReviewAction::Reject),
            _ => None,
        }
    }
}

/// A student's result for one exam.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamResult {
    pub id: ResultId,
    pub student_id: StudentId,
    pub exam_id: ExamId,
    pub marks_obtained: i32,
    /// Derived from marks and the exam thresholds on every write
    pub grade: Grade,
    pub remarks: Option<String>,
    pub status: ResultStatus,
    /// Teacher who authored (and later publishes) the result
    pub published_by: Option<UserId>,
    /// Admin who approved; stays empty on rejection
    pub approved_by: Option<UserId>,
    pub approval_remarks: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result joined with student and exam display fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ResultWithContext {
    pub id: ResultId,
    pub student_id: StudentId,
    pub student_code: String,
    pub student_name: String,
    pub exam_id: ExamId,
    pub exam_name: String,
    pub marks_obtained: i32,
    pub grade: Grade,
    pub remarks: Option<String>,
    pub status: ResultStatus,
    pub published_by: Option<UserId>,
    pub approved_by: Option<UserId>,
    pub approval_remarks: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a draft result.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateResultDto {
    pub student_id: StudentId,
    pub exam_id: ExamId,
    #[validate(range(min = 0))]
    pub marks_obtained: i32,
    pub remarks: Option<String>,
}

/// DTO for updating a draft result.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateResultDto {
    #[validate(range(min = 0))]
    pub marks_obtained: Option<i32>,
    pub remarks: Option<String>,
}

/// Request body for the publish transition.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PublishResultsDto {
    pub exam_id: ExamId,
}

/// Request body for the approve/reject transition.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReviewResultsDto {
    pub exam_id: ExamId,
    /// Optionally narrow the sweep to students of one class
    pub class: Option<String>,
    /// `approve` or `reject`; anything else is rejected
    pub action: String,
    pub remarks: Option<String>,
}

/// Count of records moved by a bulk transition.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkTransitionResponse {
    pub updated: u64,
}

/// Query parameters for filtering results.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ResultFilterParams {
    pub exam_id: Option<ExamId>,
    pub student_id: Option<StudentId>,
    pub status: Option<ResultStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing results.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResultsResponse {
    pub data: Vec<ResultWithContext>,
    pub meta: PaginationMeta,
}
