use sqlx::PgPool;
use tracing::instrument;

use crate::modules::academic_years::model::{
    AcademicYear, CreateAcademicYearDto, UpdateAcademicYearDto,
};
use markbook_core::AppError;
use markbook_models::ids::AcademicYearId;

const ACADEMIC_YEAR_COLUMNS: &str =
    "id, name, start_date, end_date, is_current, created_at, updated_at";

pub struct AcademicYearService;

impl AcademicYearService {
    /// Create a new academic year.
    ///
    /// When `is_current` is set, every other year's flag is cleared in the
    /// same transaction, so exactly one year ends up current.
    #[instrument(skip(db, dto))]
    pub async fn create_academic_year(
        db: &PgPool,
        dto: CreateAcademicYearDto,
    ) -> Result<AcademicYear, AppError> {
        if dto.start_date >= dto.end_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Start date must be before end date"
            )));
        }

        let mut tx = db.begin().await?;

        if dto.is_current {
            sqlx::query(
                "UPDATE academic_years SET is_current = FALSE, updated_at = NOW() WHERE is_current",
            )
            .execute(&mut *tx)
            .await?;
        }

        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            r#"INSERT INTO academic_years (name, start_date, end_date, is_current)
               VALUES ($1, $2, $3, $4)
               RETURNING {ACADEMIC_YEAR_COLUMNS}"#
        ))
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
                        "An academic year named {} already exists",
                        dto.name
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        tx.commit().await?;

        Ok(year)
    }

    /// List all academic years, most recent first.
    #[instrument(skip(db))]
    pub async fn get_academic_years(db: &PgPool) -> Result<Vec<AcademicYear>, AppError> {
        let years = sqlx::query_as::<_, AcademicYear>(&format!(
            "SELECT {ACADEMIC_YEAR_COLUMNS} FROM academic_years ORDER BY start_date DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(years)
    }

    /// Get an academic year by ID.
    #[instrument(skip(db))]
    pub async fn get_academic_year_by_id(
        db: &PgPool,
        id: AcademicYearId,
    ) -> Result<AcademicYear, AppError> {
        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            "SELECT {ACADEMIC_YEAR_COLUMNS} FROM academic_years WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Academic year not found")))?;

        Ok(year)
    }

    /// Get the current academic year, if one is set.
    #[instrument(skip(db))]
    pub async fn get_current_academic_year(
        db: &PgPool,
    ) -> Result<Option<AcademicYear>, AppError> {
        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            "SELECT {ACADEMIC_YEAR_COLUMNS} FROM academic_years WHERE is_current"
        ))
        .fetch_optional(db)
        .await?;

        Ok(year)
    }

    /// Update an academic year.
    ///
    /// Setting `is_current = true` clears the flag on all other years in the
    /// same transaction.
    #[instrument(skip(db, dto))]
    pub async fn update_academic_year(
        db: &PgPool,
        id: AcademicYearId,
        dto: UpdateAcademicYearDto,
    ) -> Result<AcademicYear, AppError> {
        let existing = Self::get_academic_year_by_id(db, id).await?;

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
                r#"UPDATE academic_years SET is_current = FALSE, updated_at = NOW()
                   WHERE is_current AND id <> $1"#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let year = sqlx::query_as::<_, AcademicYear>(&format!(
            r#"UPDATE academic_years
               SET name = $1, start_date = $2, end_date = $3, is_current = $4, updated_at = NOW()
               WHERE id = $5
               RETURNING {ACADEMIC_YEAR_COLUMNS}"#
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
                        "An academic year named {} already exists",
                        name
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        tx.commit().await?;

        Ok(year)
    }

    /// Delete an academic year. Dependent semesters cascade.
    #[instrument(skip(db))]
    pub async fn delete_academic_year(db: &PgPool, id: AcademicYearId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM academic_years WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Academic year not found"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    fn year_dto(name: &str, start_year: i32, is_current: bool) -> CreateAcademicYearDto {
        CreateAcademicYearDto {
            name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(start_year, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(start_year + 1, 5, 31).unwrap(),
            is_current,
        }
    }

    async fn count_current(pool: &PgPool) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM academic_years WHERE is_current")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_academic_year(pool: PgPool) {
        let year = AcademicYearService::create_academic_year(&pool, year_dto("2024-25", 2024, false))
            .await
            .unwrap();
        assert_eq!(year.name, "2024-25");
        assert!(!year.is_current);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_academic_year_invalid_dates(pool: PgPool) {
        let mut dto = year_dto("2024-25", 2024, false);
        dto.end_date = dto.start_date;
        let err = AcademicYearService::create_academic_year(&pool, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_academic_year_duplicate_name(pool: PgPool) {
        AcademicYearService::create_academic_year(&pool, year_dto("2024-25", 2024, false))
            .await
            .unwrap();
        let err =
            AcademicYearService::create_academic_year(&pool, year_dto("2024-25", 2024, false))
                .await
                .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_creating_current_year_clears_previous(pool: PgPool) {
        let old = AcademicYearService::create_academic_year(&pool, year_dto("2023-24", 2023, true))
            .await
            .unwrap();
        assert!(old.is_current);

        let new = AcademicYearService::create_academic_year(&pool, year_dto("2024-25", 2024, true))
            .await
            .unwrap();
        assert!(new.is_current);

        let old_refetched = AcademicYearService::get_academic_year_by_id(&pool, old.id)
            .await
            .unwrap();
        assert!(!old_refetched.is_current);
        assert_eq!(count_current(&pool).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_to_current_clears_siblings(pool: PgPool) {
        let first = AcademicYearService::create_academic_year(&pool, year_dto("2023-24", 2023, true))
            .await
            .unwrap();
        let second =
            AcademicYearService::create_academic_year(&pool, year_dto("2024-25", 2024, false))
                .await
                .unwrap();

        AcademicYearService::update_academic_year(
            &pool,
            second.id,
            UpdateAcademicYearDto {
                name: None,
                start_date: None,
                end_date: None,
                is_current: Some(true),
            },
        )
        .await
        .unwrap();

        let first_refetched = AcademicYearService::get_academic_year_by_id(&pool, first.id)
            .await
            .unwrap();
        assert!(!first_refetched.is_current);
        assert_eq!(count_current(&pool).await, 1);

        let current = AcademicYearService::get_current_academic_year(&pool)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.id, second.id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_keeps_current_when_resetting_same_year(pool: PgPool) {
        let year = AcademicYearService::create_academic_year(&pool, year_dto("2024-25", 2024, true))
            .await
            .unwrap();

        let updated = AcademicYearService::update_academic_year(
            &pool,
            year.id,
            UpdateAcademicYearDto {
                name: Some("2024-2025".to_string()),
                start_date: None,
                end_date: None,
                is_current: None,
            },
        )
        .await
        .unwrap();

        assert!(updated.is_current);
        assert_eq!(count_current(&pool).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_academic_year(pool: PgPool) {
        let year = AcademicYearService::create_academic_year(&pool, year_dto("2024-25", 2024, false))
            .await
            .unwrap();

        AcademicYearService::delete_academic_year(&pool, year.id)
            .await
            .unwrap();

        let err = AcademicYearService::get_academic_year_by_id(&pool, year.id)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
