mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{create_test_exam, create_test_student, create_test_user, generate_unique_email};
use http_body_util::BodyExt;
use markbook::config::cors::CorsConfig;
use markbook::config::jwt::JwtConfig;
use markbook::router::init_router;
use markbook::state::AppState;
use markbook_models::users::UserRole;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;

async fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool.clone(),
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

async fn get_auth_token(app: axum::Router, email: &str, password: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({
                "email": email,
                "password": password
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    body["access_token"].as_str().unwrap().to_string()
}

fn authed_json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_result_lifecycle_draft_publish_approve(pool: PgPool) {
    let teacher_email = generate_unique_email();
    let admin_email = generate_unique_email();
    create_test_user(&pool, &teacher_email, "teacherpass", UserRole::Teacher).await;
    create_test_user(&pool, &admin_email, "adminpass", UserRole::Admin).await;
    let student = create_test_student(&pool, "10", "A").await;
    let exam_id = create_test_exam(&pool, 100, 40).await;

    let teacher_token =
        get_auth_token(setup_test_app(pool.clone()).await, &teacher_email, "teacherpass").await;
    let admin_token =
        get_auth_token(setup_test_app(pool.clone()).await, &admin_email, "adminpass").await;
    let student_token = get_auth_token(
        setup_test_app(pool.clone()).await,
        &student.user.email,
        "studentpass123",
    )
    .await;

    // Teacher records a draft; grade is derived server-side
    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "POST",
            "/api/results",
            &teacher_token,
            json!({
                "student_id": student.id,
                "exam_id": exam_id,
                "marks_obtained": 85
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let draft = json_body(response).await;
    assert_eq!(draft["grade"], "A");
    assert_eq!(draft["status"], "draft");

    // Student cannot see it yet
    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_get("/api/results", &student_token))
        .await
        .unwrap();
    let listing = json_body(response).await;
    assert_eq!(listing["meta"]["total"], 0);

    // Teacher publishes the exam's drafts
    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "POST",
            "/api/results/publish",
            &teacher_token,
            json!({"exam_id": exam_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let published = json_body(response).await;
    assert_eq!(published["updated"], 1);

    // Teacher and admin can now read it; the student still cannot
    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_get("/api/results", &teacher_token))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["meta"]["total"], 1);

    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_get("/api/results", &admin_token))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["meta"]["total"], 1);

    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_get("/api/results", &student_token))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["meta"]["total"], 0);

    // Admin approves the pending batch
    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "POST",
            "/api/results/approve",
            &admin_token,
            json!({
                "exam_id": exam_id,
                "action": "approve",
                "remarks": "Verified"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["updated"], 1);

    // The student can now read their approved result
    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_get("/api/results", &student_token))
        .await
        .unwrap();
    let listing = json_body(response).await;
    assert_eq!(listing["meta"]["total"], 1);
    assert_eq!(listing["data"][0]["status"], "approved");
    assert_eq!(listing["data"][0]["grade"], "A");
    assert_eq!(listing["data"][0]["student_code"], student.student_code);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_result_conflict(pool: PgPool) {
    let teacher_email = generate_unique_email();
    create_test_user(&pool, &teacher_email, "teacherpass", UserRole::Teacher).await;
    let student = create_test_student(&pool, "10", "A").await;
    let exam_id = create_test_exam(&pool, 100, 40).await;

    let token =
        get_auth_token(setup_test_app(pool.clone()).await, &teacher_email, "teacherpass").await;

    let body = json!({
        "student_id": student.id,
        "exam_id": exam_id,
        "marks_obtained": 85
    });

    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request("POST", "/api/results", &token, body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request("POST", "/api/results", &token, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error = json_body(response).await;
    assert_eq!(error["code"], "duplicate_result");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_draft_owned_by_other_teacher_forbidden(pool: PgPool) {
    let owner_email = generate_unique_email();
    let intruder_email = generate_unique_email();
    create_test_user(&pool, &owner_email, "ownerpass", UserRole::Teacher).await;
    create_test_user(&pool, &intruder_email, "intruderpass", UserRole::Teacher).await;
    let student = create_test_student(&pool, "10", "A").await;
    let exam_id = create_test_exam(&pool, 100, 40).await;

    let owner_token =
        get_auth_token(setup_test_app(pool.clone()).await, &owner_email, "ownerpass").await;
    let intruder_token = get_auth_token(
        setup_test_app(pool.clone()).await,
        &intruder_email,
        "intruderpass",
    )
    .await;

    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "POST",
            "/api/results",
            &owner_token,
            json!({
                "student_id": student.id,
                "exam_id": exam_id,
                "marks_obtained": 85
            }),
        ))
        .await
        .unwrap();
    let draft = json_body(response).await;
    let result_id = draft["id"].as_str().unwrap().to_string();

    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "PUT",
            &format!("/api/results/{result_id}"),
            &intruder_token,
            json!({"marks_obtained": 10}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_publish_with_no_drafts_is_not_found(pool: PgPool) {
    let teacher_email = generate_unique_email();
    create_test_user(&pool, &teacher_email, "teacherpass", UserRole::Teacher).await;
    let exam_id = create_test_exam(&pool, 100, 40).await;

    let token =
        get_auth_token(setup_test_app(pool.clone()).await, &teacher_email, "teacherpass").await;

    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "POST",
            "/api/results/publish",
            &token,
            json!({"exam_id": exam_id}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error = json_body(response).await;
    assert_eq!(error["code"], "nothing_to_publish");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reject_batch_records_remarks_only(pool: PgPool) {
    let teacher_email = generate_unique_email();
    let admin_email = generate_unique_email();
    create_test_user(&pool, &teacher_email, "teacherpass", UserRole::Teacher).await;
    create_test_user(&pool, &admin_email, "adminpass", UserRole::Admin).await;
    let student = create_test_student(&pool, "10", "A").await;
    let exam_id = create_test_exam(&pool, 100, 40).await;

    let teacher_token =
        get_auth_token(setup_test_app(pool.clone()).await, &teacher_email, "teacherpass").await;
    let admin_token =
        get_auth_token(setup_test_app(pool.clone()).await, &admin_email, "adminpass").await;

    setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "POST",
            "/api/results",
            &teacher_token,
            json!({
                "student_id": student.id,
                "exam_id": exam_id,
                "marks_obtained": 85
            }),
        ))
        .await
        .unwrap();
    setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "POST",
            "/api/results/publish",
            &teacher_token,
            json!({"exam_id": exam_id}),
        ))
        .await
        .unwrap();

    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "POST",
            "/api/results/approve",
            &admin_token,
            json!({
                "exam_id": exam_id,
                "action": "reject",
                "remarks": "incomplete marksheet"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["updated"], 1);

    // Rejection keeps approver fields empty
    let row = sqlx::query_as::<_, (String, Option<String>, Option<uuid::Uuid>)>(
        "SELECT status::text, approval_remarks, approved_by FROM results LIMIT 1",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(row.0, "rejected");
    assert_eq!(row.1.as_deref(), Some("incomplete marksheet"));
    assert!(row.2.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_review_with_invalid_action(pool: PgPool) {
    let admin_email = generate_unique_email();
    create_test_user(&pool, &admin_email, "adminpass", UserRole::Admin).await;
    let exam_id = create_test_exam(&pool, 100, 40).await;

    let admin_token =
        get_auth_token(setup_test_app(pool.clone()).await, &admin_email, "adminpass").await;

    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "POST",
            "/api/results/approve",
            &admin_token,
            json!({
                "exam_id": exam_id,
                "action": "escalate"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = json_body(response).await;
    assert_eq!(error["code"], "invalid_action");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_cannot_create_results(pool: PgPool) {
    let student = create_test_student(&pool, "10", "A").await;
    let exam_id = create_test_exam(&pool, 100, 40).await;

    let token = get_auth_token(
        setup_test_app(pool.clone()).await,
        &student.user.email,
        "studentpass123",
    )
    .await;

    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "POST",
            "/api/results",
            &token,
            json!({
                "student_id": student.id,
                "exam_id": exam_id,
                "marks_obtained": 100
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_cannot_review_results(pool: PgPool) {
    let teacher_email = generate_unique_email();
    create_test_user(&pool, &teacher_email, "teacherpass", UserRole::Teacher).await;
    let exam_id = create_test_exam(&pool, 100, 40).await;

    let token =
        get_auth_token(setup_test_app(pool.clone()).await, &teacher_email, "teacherpass").await;

    let response = setup_test_app(pool.clone())
        .await
        .oneshot(authed_json_request(
            "POST",
            "/api/results/approve",
            &token,
            json!({
                "exam_id": exam_id,
                "action": "approve"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
