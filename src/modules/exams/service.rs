use sqlx::PgPool;
use tracing::instrument;

use crate::modules::exams::model::{
    CreateExamDto, Exam, ExamFilterParams, ExamWithSubject, PaginatedExamsResponse, UpdateExamDto,
};
use markbook_core::{AppError, PaginationMeta};
use markbook_models::ids::ExamId;

const EXAM_WITH_SUBJECT_SELECT: &str = r#"
    SELECT e.id, e.name, e.exam_type, e.subject_id, s.name AS subject_name,
           e.total_marks, e.passing_marks, e.exam_date, e.is_active,
           e.created_at, e.updated_at
    FROM exams e
    JOIN subjects s ON s.id = e.subject_id
"#;

pub struct ExamService;

impl ExamService {
    /// Create an exam under a subject.
    #[instrument(skip(db, dto))]
    pub async fn create_exam(db: &PgPool, dto: CreateExamDto) -> Result<Exam, AppError> {
        let subject_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM subjects WHERE id = $1)",
        )
        .bind(dto.subject_id)
        .fetch_one(db)
        .await?;

        if !subject_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Subject not found")));
        }

        let exam = sqlx::query_as::<_, Exam>(
            r#"INSERT INTO exams (name, exam_type, subject_id, total_marks, passing_marks, exam_date)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id, name, exam_type, subject_id, total_marks, passing_marks,
                         exam_date, is_active, created_at, updated_at"#,
        )
        .bind(&dto.name)
        .bind(dto.exam_type)
        .bind(dto.subject_id)
        .bind(dto.total_marks)
        .bind(dto.passing_marks)
        .bind(dto.exam_date)
        .fetch_one(db)
        .await?;

        Ok(exam)
    }

    /// Get paginated list of exams, most recent first.
    #[instrument(skip(db))]
    pub async fn get_exams(
        db: &PgPool,
        filters: ExamFilterParams,
    ) -> Result<PaginatedExamsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM exams e
               WHERE ($1::uuid IS NULL OR e.subject_id = $1)
                 AND ($2::exam_type IS NULL OR e.exam_type = $2)
                 AND ($3::boolean IS NULL OR e.is_active = $3)"#,
        )
        .bind(filters.subject_id)
        .bind(filters.exam_type)
        .bind(filters.is_active)
        .fetch_one(db)
        .await?;

        let query = format!(
            r#"{EXAM_WITH_SUBJECT_SELECT}
               WHERE ($1::uuid IS NULL OR e.subject_id = $1)
                 AND ($2::exam_type IS NULL OR e.exam_type = $2)
                 AND ($3::boolean IS NULL OR e.is_active = $3)
               ORDER BY e.exam_date DESC
               LIMIT $4 OFFSET $5"#
        );

        let exams = sqlx::query_as::<_, ExamWithSubject>(&query)
            .bind(filters.subject_id)
            .bind(filters.exam_type)
            .bind(filters.is_active)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;

        let has_more = offset + limit < total;

        Ok(PaginatedExamsResponse {
            data: exams,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: filters.pagination.page(),
                has_more,
            },
        })
    }

    /// Get an exam by ID with its subject name.
    #[instrument(skip(db))]
    pub async fn get_exam_by_id(db: &PgPool, id: ExamId) -> Result<ExamWithSubject, AppError> {
        let query = format!("{EXAM_WITH_SUBJECT_SELECT} WHERE e.id = $1");

        let exam = sqlx::query_as::<_, ExamWithSubject>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Exam not found")))?;

        Ok(exam)
    }

    /// Update an exam. Changing thresholds does not rewrite existing grades;
    /// grades are recomputed only when a result is written.
    #[instrument(skip(db, dto))]
    pub async fn update_exam(
        db: &PgPool,
        id: ExamId,
        dto: UpdateExamDto,
    ) -> Result<Exam, AppError> {
        let existing = sqlx::query_as::<_, Exam>(
            r#"SELECT id, name, exam_type, subject_id, total_marks, passing_marks,
                      exam_date, is_active, created_at, updated_at
               FROM exams WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Exam not found")))?;

        let name = dto.name.unwrap_or(existing.name);
        let exam_type = dto.exam_type.unwrap_or(existing.exam_type);
        let total_marks = dto.total_marks.unwrap_or(existing.total_marks);
        let passing_marks = dto.passing_marks.unwrap_or(existing.passing_marks);
        let exam_date = dto.exam_date.unwrap_or(existing.exam_date);
        let is_active = dto.is_active.unwrap_or(existing.is_active);

        let exam = sqlx::query_as::<_, Exam>(
            r#"UPDATE exams
               SET name = $1, exam_type = $2, total_marks = $3, passing_marks = $4,
                   exam_date = $5, is_active = $6, updated_at = NOW()
               WHERE id = $7
               RETURNING id, name, exam_type, subject_id, total_marks, passing_marks,
                         exam_date, is_active, created_at, updated_at"#,
        )
        .bind(&name)
        .bind(exam_type)
        .bind(total_marks)
        .bind(passing_marks)
        .bind(exam_date)
        .bind(is_active)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(exam)
    }

    /// Delete an exam. Dependent results cascade.
    #[instrument(skip(db))]
    pub async fn delete_exam(db: &PgPool, id: ExamId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Exam not found")));
        }

        Ok(())
    }
}
