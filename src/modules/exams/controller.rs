use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use tracing::instrument;

use crate::middleware::role::RequireAdmin;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::exams::model::{
    CreateExamDto, Exam, ExamFilterParams, ExamWithSubject, PaginatedExamsResponse, UpdateExamDto,
};
use crate::modules::exams::service::ExamService;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use markbook_core::AppError;
use markbook_models::ids::ExamId;

#[utoipa::path(
    post,
    path = "/api/exams",
    request_body = CreateExamDto,
    responses(
        (status = 200, description = "Exam created successfully", body = Exam),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, dto))]
pub async fn create_exam(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateExamDto>,
) -> Result<Json<Exam>, AppError> {
    let exam = ExamService::create_exam(&state.db, dto).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    get,
    path = "/api/exams",
    params(ExamFilterParams),
    responses(
        (status = 200, description = "List of exams", body = PaginatedExamsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Teacher or Admin only", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn get_exams(
    State(state): State<AppState>,
    Query(filters): Query<ExamFilterParams>,
) -> Result<Json<PaginatedExamsResponse>, AppError> {
    let response = ExamService::get_exams(&state.db, filters).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/exams/{id}",
    params(("id" = ExamId, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam details", body = ExamWithSubject),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Teacher or Admin only", body = ErrorResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn get_exam(
    State(state): State<AppState>,
    Path(id): Path<ExamId>,
) -> Result<Json<ExamWithSubject>, AppError> {
    let exam = ExamService::get_exam_by_id(&state.db, id).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    put,
    path = "/api/exams/{id}",
    params(("id" = ExamId, Path, description = "Exam ID")),
    request_body = UpdateExamDto,
    responses(
        (status = 200, description = "Exam updated successfully", body = Exam),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state, dto))]
pub async fn update_exam(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ExamId>,
    ValidatedJson(dto): ValidatedJson<UpdateExamDto>,
) -> Result<Json<Exam>, AppError> {
    let exam = ExamService::update_exam(&state.db, id, dto).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    delete,
    path = "/api/exams/{id}",
    params(("id" = ExamId, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn delete_exam(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ExamId>,
) -> Result<Json<serde_json::Value>, AppError> {
    ExamService::delete_exam(&state.db, id).await?;
    Ok(Json(json!({"message": "Exam deleted successfully"})))
}
