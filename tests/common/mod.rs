use markbook_core::hash_password;
use markbook_models::ids::{ExamId, StudentId, SubjectId, UserId};
use markbook_models::users::UserRole;
use sqlx::PgPool;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[allow(dead_code)]
pub struct TestStudent {
    pub id: StudentId,
    pub user: TestUser,
    pub student_code: String,
}

pub fn generate_unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4())
}

#[allow(dead_code)]
pub fn generate_unique_code(prefix: &str) -> String {
    format!("{}{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

/// Create a test user with the given role.
pub async fn create_test_user(
    pool: &PgPool,
    email: &str,
    password: &str,
    role: UserRole,
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, UserId>(
        r#"INSERT INTO users (first_name, last_name, email, password, role)
           VALUES ('Test', 'User', $1, $2, $3)
           RETURNING id"#,
    )
    .bind(email)
    .bind(&hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    TestUser {
        id,
        email: email.to_string(),
        password: password.to_string(),
        role,
    }
}

/// Create a student profile backed by a fresh user account.
#[allow(dead_code)]
pub async fn create_test_student(pool: &PgPool, class: &str, section: &str) -> TestStudent {
    let email = generate_unique_email();
    let user = create_test_user(pool, &email, "studentpass123", UserRole::Student).await;
    let student_code = generate_unique_code("STU");

    let id = sqlx::query_scalar::<_, StudentId>(
        r#"INSERT INTO students (user_id, student_code, admission_number, current_class, current_section)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING id"#,
    )
    .bind(user.id)
    .bind(&student_code)
    .bind(generate_unique_code("ADM"))
    .bind(class)
    .bind(section)
    .fetch_one(pool)
    .await
    .unwrap();

    TestStudent {
        id,
        user,
        student_code,
    }
}

/// Create a subject with a unique code.
#[allow(dead_code)]
pub async fn create_test_subject(pool: &PgPool) -> SubjectId {
    let code = generate_unique_code("SUB");
    sqlx::query_scalar::<_, SubjectId>(
        "INSERT INTO subjects (name, code) VALUES ($1, $2) RETURNING id",
    )
    .bind(format!("Subject {code}"))
    .bind(&code)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Create an exam under a fresh subject.
#[allow(dead_code)]
pub async fn create_test_exam(pool: &PgPool, total_marks: i32, passing_marks: i32) -> ExamId {
    let subject_id = create_test_subject(pool).await;

    sqlx::query_scalar::<_, ExamId>(
        r#"INSERT INTO exams (name, exam_type, subject_id, total_marks, passing_marks, exam_date)
           VALUES ('Mid Term', 'mid_term', $1, $2, $3, '2025-10-15')
           RETURNING id"#,
    )
    .bind(subject_id)
    .bind(total_marks)
    .bind(passing_marks)
    .fetch_one(pool)
    .await
    .unwrap()
}
