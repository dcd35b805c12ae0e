use sqlx::PgPool;
use tracing::instrument;

use crate::modules::subjects::model::{CreateSubjectDto, Subject};
use markbook_core::AppError;
use markbook_models::ids::SubjectId;

pub struct SubjectService;

impl SubjectService {
    /// Create a subject.
    #[instrument(skip(db, dto))]
    pub async fn create_subject(db: &PgPool, dto: CreateSubjectDto) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"INSERT INTO subjects (name, code, description)
               VALUES ($1, $2, $3)
               RETURNING id, name, code, description, is_active, created_at"#,
        )
        .bind(&dto.name)
        .bind(&dto.code)
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "Subject with this name or code already exists"
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok(subject)
    }

    /// List all subjects, active first, then by name.
    #[instrument(skip(db))]
    pub async fn get_subjects(db: &PgPool) -> Result<Vec<Subject>, AppError> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"SELECT id, name, code, description, is_active, created_at
               FROM subjects
               ORDER BY is_active DESC, name"#,
        )
        .fetch_all(db)
        .await?;

        Ok(subjects)
    }

    /// Get a subject by ID.
    #[instrument(skip(db))]
    pub async fn get_subject_by_id(db: &PgPool, id: SubjectId) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"SELECT id, name, code, description, is_active, created_at
               FROM subjects WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Subject not found")))?;

        Ok(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn math_dto() -> CreateSubjectDto {
        CreateSubjectDto {
            name: "Mathematics".to_string(),
            code: "MATH101".to_string(),
            description: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_and_fetch_subject(pool: PgPool) {
        let subject = SubjectService::create_subject(&pool, math_dto()).await.unwrap();
        assert_eq!(subject.code, "MATH101");
        assert!(subject.is_active);

        let fetched = SubjectService::get_subject_by_id(&pool, subject.id)
            .await
            .unwrap();
        assert_eq!(fetched.name, "Mathematics");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_subject_duplicate_code(pool: PgPool) {
        SubjectService::create_subject(&pool, math_dto()).await.unwrap();

        let mut dto = math_dto();
        dto.name = "Applied Mathematics".to_string();
        let err = SubjectService::create_subject(&pool, dto).await.unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }
}
