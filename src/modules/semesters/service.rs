use sqlx::PgPool;
use tracing::instrument;

use crate::modules::semesters::model::{
    CreateSemesterDto, Semester, SemesterWithYear, UpdateSemesterDto,
};
use markbook_core::AppError;
use markbook_models::ids::SemesterId;

const SEMESTER_COLUMNS: &str =
    "id, academic_year_id, name, start_date, end_date, is_current, created_at, updated_at";

const SEMESTER_WITH_YEAR_SELECT: &str = r#"
    SELECT s.id, s.academic_year_id, y.name AS academic_year_name,
           s.name, s.start_date, s.end_date, s.is_current,
           s.created_at, s.updated_at
    FROM semesters s
    JOIN academic_years y ON y.id = s.academic_year_id
"#;

pub struct SemesterService;

impl SemesterService {
    /// Create a semester under an academic year.
    ///
    /// When `is_current` is set, the flag is cleared on every other semester
    /// in the same transaction. Currency is global across years.
    #[instrument(skip(db, dto))]
    pub async fn create_semester(
        db: &PgPool,
        dto: CreateSemesterDto,
    ) -> Result<Semester, AppError> {
        if dto.start_date >= dto.end_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Start date must be before end date"
            )));
        }

        let year_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM academic_years WHERE id = $1)",
        )
        .bind(dto.academic_year_id)
        .fetch_one(db)
        .await?;

        if !year_exists {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Academic year not found"
            )));
        }

        let mut tx = db.begin().await?;

        if dto.is_current {
            sqlx::query(
                "UPDATE semesters SET is_current = FALSE, updated_at = NOW() WHERE is_current",
            )
            .execute(&mut *tx)
            .await?;
        }

        let semester = sqlx::query_as::<_, Semester>(&format!(
            r#"INSERT INTO semesters (academic_year_id, name, start_date, end_date, is_current)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {SEMESTER_COLUMNS}"#
        ))
        .bind(dto.academic_year_id)
        .bind(&dto.name)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.is_current)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "A semester named {} already exists in this academic year",
                        dto.name
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        tx.commit().await?;

        Ok(semester)
    }

    /// List all semesters with their academic year names.
    #[instrument(skip(db))]
    pub async fn get_semesters(db: &PgPool) -> Result<Vec<SemesterWithYear>, AppError> {
        let semesters = sqlx::query_as::<_, SemesterWithYear>(&format!(
            "{SEMESTER_WITH_YEAR_SELECT} ORDER BY y.start_date DESC, s.start_date"
        ))
        .fetch_all(db)
        .await?;

        Ok(semesters)
    }

    /// Get a semester by ID with its academic year name.
    #[instrument(skip(db))]
    pub async fn get_semester_by_id(
        db: &PgPool,
        id: SemesterId,
    ) -> Result<SemesterWithYear, AppError> {
        let semester = sqlx::query_as::<_, SemesterWithYear>(&format!(
            "{SEMESTER_WITH_YEAR_SELECT} WHERE s.id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Semester not found")))?;

        Ok(semester)
    }

    /// Get the current semester, if one is set.
    #[instrument(skip(db))]
    pub async fn get_current_semester(db: &PgPool) -> Result<Option<SemesterWithYear>, AppError> {
        let semester = sqlx::query_as::<_, SemesterWithYear>(&format!(
            "{SEMESTER_WITH_YEAR_SELECT} WHERE s.is_current"
        ))
        .fetch_optional(db)
        .await?;

        Ok(semester)
    }

    /// Update a semester.
    ///
    /// Setting `is_current = true` clears the flag on every other semester
    /// in the same transaction.
    #[instrument(skip(db, dto))]
    pub async fn update_semester(
        db: &PgPool,
        id: SemesterId,
        dto: UpdateSemesterDto,
    ) -> Result<Semester, AppError> {
        let existing = sqlx::query_as::<_, Semester>(&format!(
            "SELECT {SEMESTER_COLUMNS} FROM semesters WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Semester not found")))?;

        let name = dto.name.unwrap_or(existing.name);
        let start_date = dto.start_date.unwrap_or(existing.start_date);
        let end_date = dto.end_date.unwrap_or(existing.end_date);
        let is_current = dto.is_current.unwrap_or(existing.is_current);

        if start_date >= end_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Start date must be before end date"
            )));
        }

        let mut tx = db.begin().await?;

        if is_current {
            sqlx::query(
                r#"UPDATE semesters SET is_current = FALSE, updated_at = NOW()
                   WHERE is_current AND id <> $1"#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let semester = sqlx::query_as::<_, Semester>(&format!(
            r#"UPDATE semesters
               SET name = $1, start_date = $2, end_date = $3, is_current = $4, updated_at = NOW()
               WHERE id = $5
               RETURNING {SEMESTER_COLUMNS}"#
        ))
        .bind(&name)
        .bind(start_date)
        .bind(end_date)
        .bind(is_current)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "A semester named {} already exists in this academic year",
                        name
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        tx.commit().await?;

        Ok(semester)
    }

    /// Delete a semester.
    #[instrument(skip(db))]
    pub async fn delete_semester(db: &PgPool, id: SemesterId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM semesters WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Semester not found")));
        }

        Ok(())
    }
}
