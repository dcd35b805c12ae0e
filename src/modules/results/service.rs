use sqlx::PgPool;
use tracing::{info, instrument};

use crate::modules::results::model::{
    CreateResultDto, ExamResult, Grade, PaginatedResultsResponse, ResultFilterParams,
    ResultStatus, ResultWithContext, ReviewAction, ReviewResultsDto, UpdateResultDto,
};
use markbook_core::{AppError, PaginationMeta};
use markbook_models::ids::{ExamId, ResultId, UserId};
use markbook_models::users::UserRole;

const RESULT_COLUMNS: &str = r#"id, student_id, exam_id, marks_obtained, grade, remarks, status,
    published_by, approved_by, approval_remarks, published_at, approved_at,
    created_at, updated_at"#;

const RESULT_WITH_CONTEXT_SELECT: &str = r#"
    SELECT r.id, r.student_id, s.student_code,
           u.first_name || ' ' || u.last_name AS student_name,
           r.exam_id, e.name AS exam_name,
           r.marks_obtained, r.grade, r.remarks, r.status,
           r.published_by, r.approved_by, r.approval_remarks,
           r.published_at, r.approved_at, r.created_at, r.updated_at
    FROM results r
    JOIN students s ON s.id = r.student_id
    JOIN users u ON u.id = s.user_id
    JOIN exams e ON e.id = r.exam_id
"#;

/// Role-dispatched read predicate. Binds: $1 = actor user id, $2 = actor
/// role. Students see only their own approved results, teachers their own
/// non-draft results, everyone else (admins) every non-draft result.
const VISIBILITY_PREDICATE: &str = r#"
    CASE $2::user_role
        WHEN 'student' THEN r.status = 'approved' AND s.user_id = $1
        WHEN 'teacher' THEN r.published_by = $1 AND r.status <> 'draft'
        ELSE r.status <> 'draft'
    END
"#;

struct ExamThresholds {
    total_marks: i32,
    passing_marks: i32,
}

pub struct ResultService;

impl ResultService {
    async fn exam_thresholds(db: &PgPool, exam_id: ExamId) -> Result<ExamThresholds, AppError> {
        let row = sqlx::query_as::<_, (i32, i32)>(
            "SELECT total_marks, passing_marks FROM exams WHERE id = $1",
        )
        .bind(exam_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Exam not found")))?;

        Ok(ExamThresholds {
            total_marks: row.0,
            passing_marks: row.1,
        })
    }

    fn compute_grade(marks_obtained: i32, exam: &ExamThresholds) -> Result<Grade, AppError> {
        Grade::from_marks(marks_obtained, exam.total_marks, exam.passing_marks).map_err(|e| {
            AppError::unprocessable(anyhow::anyhow!("{}", e))
                .with_code("invalid_exam_configuration")
        })
    }

    /// Create a draft result authored by `author`.
    ///
    /// The grade is computed from the exam's thresholds before the insert;
    /// a concurrent duplicate insert loses against the (student, exam)
    /// unique constraint.
    #[instrument(skip(db, dto))]
    pub async fn create_draft(
        db: &PgPool,
        dto: CreateResultDto,
        author: UserId,
    ) -> Result<ExamResult, AppError> {
        let exam = Self::exam_thresholds(db, dto.exam_id).await?;

        let student_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(dto.student_id)
                .fetch_one(db)
                .await?;

        if !student_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        let grade = Self::compute_grade(dto.marks_obtained, &exam)?;

        let result = sqlx::query_as::<_, ExamResult>(&format!(
            r#"INSERT INTO results (student_id, exam_id, marks_obtained, grade, remarks, status, published_by)
               VALUES ($1, $2, $3, $4, $5, 'draft', $6)
               RETURNING {RESULT_COLUMNS}"#
        ))
        .bind(dto.student_id)
        .bind(dto.exam_id)
        .bind(dto.marks_obtained)
        .bind(grade)
        .bind(&dto.remarks)
        .bind(author)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "A result already exists for this student and exam"
                    ))
                    .with_code("duplicate_result");
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(result)
    }

    /// Update a draft result.
    ///
    /// Only the authoring teacher may edit, and only while the result is
    /// still a draft. The grade is recomputed from the new marks.
    #[instrument(skip(db, dto))]
    pub async fn update_draft(
        db: &PgPool,
        id: ResultId,
        dto: UpdateResultDto,
        actor: UserId,
    ) -> Result<ExamResult, AppError> {
        let existing = sqlx::query_as::<_, ExamResult>(&format!(
            "SELECT {RESULT_COLUMNS} FROM results WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Result not found")))?;

        if existing.published_by != Some(actor) {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Only the teacher who recorded this result can edit it"
            )));
        }

        if existing.status != ResultStatus::Draft {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Only draft results can be edited"
            )));
        }

        let marks_obtained = dto.marks_obtained.unwrap_or(existing.marks_obtained);
        let remarks = if dto.remarks.is_some() {
            dto.remarks
        } else {
            existing.remarks
        };

        let exam = Self::exam_thresholds(db, existing.exam_id).await?;
        let grade = Self::compute_grade(marks_obtained, &exam)?;

        let result = sqlx::query_as::<_, ExamResult>(&format!(
            r#"UPDATE results
               SET marks_obtained = $1, grade = $2, remarks = $3, updated_at = NOW()
               WHERE id = $4
               RETURNING {RESULT_COLUMNS}"#
        ))
        .bind(marks_obtained)
        .bind(grade)
        .bind(&remarks)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(result)
    }

    /// Publish every draft result the actor owns for one exam.
    ///
    /// A single set-based update moves the whole selection to
    /// `pending_approval`; there is no partially-published end state. Returns
    /// the number of results moved.
    #[instrument(skip(db))]
    pub async fn publish_results(
        db: &PgPool,
        exam_id: ExamId,
        actor: UserId,
    ) -> Result<u64, AppError> {
        let exam_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM exams WHERE id = $1)")
                .bind(exam_id)
                .fetch_one(db)
                .await?;

        if !exam_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Exam not found")));
        }

        let result = sqlx::query(
            r#"UPDATE results
               SET status = 'pending_approval', published_at = NOW(), updated_at = NOW()
               WHERE exam_id = $1 AND published_by = $2 AND status = 'draft'"#,
        )
        .bind(exam_id)
        .bind(actor)
        .execute(db)
        .await?;

        let updated = result.rows_affected();
        if updated == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "No draft results to publish for this exam"
            ))
            .with_code("nothing_to_publish"));
        }

        info!(exam_id = %exam_id, count = updated, "Results submitted for approval");
        Ok(updated)
    }

    /// Approve or reject every pending result for one exam, optionally
    /// narrowed to one class.
    ///
    /// Approval records the acting admin and timestamp; rejection records
    /// only the remarks. Returns the number of results moved.
    #[instrument(skip(db, dto))]
    pub async fn review_results(
        db: &PgPool,
        dto: ReviewResultsDto,
        actor: UserId,
    ) -> Result<u64, AppError> {
        let action = ReviewAction::parse(&dto.action).ok_or_else(|| {
            AppError::bad_request(anyhow::anyhow!(
                "Invalid action {:?}; expected \"approve\" or \"reject\"",
                dto.action
            ))
            .with_code("invalid_action")
        })?;

        let exam_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM exams WHERE id = $1)")
                .bind(dto.exam_id)
                .fetch_one(db)
                .await?;

        if !exam_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Exam not found")));
        }

        let result = match action {
            ReviewAction::Approve => {
                sqlx::query(
                    r#"UPDATE results r
                       SET status = 'approved', approved_by = $2, approved_at = NOW(),
                           approval_remarks = $3, updated_at = NOW()
                       FROM students s
                       WHERE s.id = r.student_id
                         AND r.exam_id = $1
                         AND r.status = 'pending_approval'
                         AND ($4::varchar IS NULL OR s.current_class = $4)"#,
                )
                .bind(dto.exam_id)
                .bind(actor)
                .bind(&dto.remarks)
                .bind(&dto.class)
                .execute(db)
                .await?
            }
            ReviewAction::Reject => {
                sqlx::query(
                    r#"UPDATE results r
                       SET status = 'rejected', approval_remarks = $2, updated_at = NOW()
                       FROM students s
                       WHERE s.id = r.student_id
                         AND r.exam_id = $1
                         AND r.status = 'pending_approval'
                         AND ($3::varchar IS NULL OR s.current_class = $3)"#,
                )
                .bind(dto.exam_id)
                .bind(&dto.remarks)
                .bind(&dto.class)
                .execute(db)
                .await?
            }
        };

        let updated = result.rows_affected();
        if updated == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "No results pending approval for this exam"
            ))
            .with_code("nothing_pending"));
        }

        info!(exam_id = %dto.exam_id, count = updated, action = %dto.action, "Pending results reviewed");
        Ok(updated)
    }

    /// List results visible to the actor, newest first.
    #[instrument(skip(db))]
    pub async fn list_results(
        db: &PgPool,
        actor: UserId,
        role: UserRole,
        filters: ResultFilterParams,
    ) -> Result<PaginatedResultsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let count_query = format!(
            r#"SELECT COUNT(*)
               FROM results r
               JOIN students s ON s.id = r.student_id
               WHERE {VISIBILITY_PREDICATE}
                 AND ($3::uuid IS NULL OR r.exam_id = $3)
                 AND ($4::uuid IS NULL OR r.student_id = $4)
                 AND ($5::result_status IS NULL OR r.status = $5)"#
        );

        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(actor)
            .bind(role)
            .bind(filters.exam_id)
            .bind(filters.student_id)
            .bind(filters.status)
            .fetch_one(db)
            .await?;

        let data_query = format!(
            r#"{RESULT_WITH_CONTEXT_SELECT}
               WHERE {VISIBILITY_PREDICATE}
                 AND ($3::uuid IS NULL OR r.exam_id = $3)
                 AND ($4::uuid IS NULL OR r.student_id = $4)
                 AND ($5::result_status IS NULL OR r.status = $5)
               ORDER BY r.created_at DESC
               LIMIT $6 OFFSET $7"#
        );

        let results = sqlx::query_as::<_, ResultWithContext>(&data_query)
            .bind(actor)
            .bind(role)
            .bind(filters.exam_id)
            .bind(filters.student_id)
            .bind(filters.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;

        let has_more = offset + limit < total;

        Ok(PaginatedResultsResponse {
            data: results,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: filters.pagination.page(),
                has_more,
            },
        })
    }

    /// Get a single result if it is visible to the actor.
    ///
    /// Results outside the actor's visibility read as not found.
    #[instrument(skip(db))]
    pub async fn get_result(
        db: &PgPool,
        actor: UserId,
        role: UserRole,
        id: ResultId,
    ) -> Result<ResultWithContext, AppError> {
        let query = format!(
            "{RESULT_WITH_CONTEXT_SELECT} WHERE {VISIBILITY_PREDICATE} AND r.id = $3"
        );

        let result = sqlx::query_as::<_, ResultWithContext>(&query)
            .bind(actor)
            .bind(role)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Result not found")))?;

        Ok(result)
    }
}
