use sqlx::PgPool;
use tracing::instrument;

use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, StudentFilterParams, StudentWithUser,
    UpdateStudentDto,
};
use markbook_core::{AppError, PaginationMeta, hash_password};
use markbook_models::ids::{StudentId, UserId};
use markbook_models::users::UserRole;

const STUDENT_WITH_USER_SELECT: &str = r#"
    SELECT s.id, s.user_id, s.student_code, s.admission_number,
           s.current_class, s.current_section,
           u.first_name, u.last_name, u.email,
           s.created_at, s.updated_at
    FROM students s
    JOIN users u ON u.id = s.user_id
"#;

pub struct StudentService;

impl StudentService {
    /// Create a student: the backing user account (role `student`) and the
    /// profile row, inside one transaction.
    #[instrument(skip(db, dto))]
    pub async fn create_student(
        db: &PgPool,
        dto: CreateStudentDto,
    ) -> Result<StudentWithUser, AppError> {
        let hashed_password = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;

        let user_id = sqlx::query_scalar::<_, UserId>(
            r#"INSERT INTO users (first_name, last_name, email, password, role)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(UserRole::Student)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "User with email {} already exists",
                        dto.email
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        let student_id = sqlx::query_scalar::<_, StudentId>(
            r#"INSERT INTO students (user_id, student_code, admission_number, current_class, current_section)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id"#,
        )
        .bind(user_id)
        .bind(&dto.student_code)
        .bind(&dto.admission_number)
        .bind(&dto.current_class)
        .bind(&dto.current_section)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::conflict(anyhow::anyhow!(
                        "Student with code {} or admission number {} already exists",
                        dto.student_code,
                        dto.admission_number
                    ));
                }
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        tx.commit().await?;

        Self::get_student_by_id(db, student_id).await
    }

    /// Get paginated list of students, optionally filtered by class/section.
    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        filters: StudentFilterParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM students s
               WHERE ($1::varchar IS NULL OR s.current_class = $1)
                 AND ($2::varchar IS NULL OR s.current_section = $2)"#,
        )
        .bind(&filters.class)
        .bind(&filters.section)
        .fetch_one(db)
        .await?;

        let query = format!(
            r#"{STUDENT_WITH_USER_SELECT}
               WHERE ($1::varchar IS NULL OR s.current_class = $1)
                 AND ($2::varchar IS NULL OR s.current_section = $2)
               ORDER BY s.student_code
               LIMIT $3 OFFSET $4"#
        );

        let students = sqlx::query_as::<_, StudentWithUser>(&query)
            .bind(&filters.class)
            .bind(&filters.section)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;

        let has_more = offset + limit < total;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: filters.pagination.page(),
                has_more,
            },
        })
    }

    /// Get a student by ID.
    #[instrument(skip(db))]
    pub async fn get_student_by_id(
        db: &PgPool,
        id: StudentId,
    ) -> Result<StudentWithUser, AppError> {
        let query = format!("{STUDENT_WITH_USER_SELECT} WHERE s.id = $1");

        let student = sqlx::query_as::<_, StudentWithUser>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        Ok(student)
    }

    /// Update a student's class/section placement.
    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<StudentWithUser, AppError> {
        let existing = Self::get_student_by_id(db, id).await?;

        let current_class = dto.current_class.unwrap_or(existing.current_class);
        let current_section = dto.current_section.unwrap_or(existing.current_section);

        sqlx::query(
            r#"UPDATE students
               SET current_class = $1, current_section = $2, updated_at = NOW()
               WHERE id = $3"#,
        )
        .bind(&current_class)
        .bind(&current_section)
        .bind(id)
        .execute(db)
        .await?;

        Self::get_student_by_id(db, id).await
    }

    /// Delete a student by removing the backing user account. The profile
    /// and any results cascade.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id = (SELECT user_id FROM students WHERE id = $1)",
        )
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }
}
