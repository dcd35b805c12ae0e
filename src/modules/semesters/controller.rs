use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::instrument;

use crate::middleware::role::RequireAdmin;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::semesters::model::{
    CreateSemesterDto, Semester, SemesterWithYear, UpdateSemesterDto,
};
use crate::modules::semesters::service::SemesterService;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use markbook_core::AppError;
use markbook_models::ids::SemesterId;

#[utoipa::path(
    post,
    path = "/api/semesters",
    request_body = CreateSemesterDto,
    responses(
        (status = 200, description = "Semester created successfully", body = Semester),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Academic year not found", body = ErrorResponse),
        (status = 409, description = "Duplicate name within the year", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state, dto))]
pub async fn create_semester(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateSemesterDto>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::create_semester(&state.db, dto).await?;
    Ok(Json(semester))
}

#[utoipa::path(
    get,
    path = "/api/semesters",
    responses(
        (status = 200, description = "List of semesters", body = Vec<SemesterWithYear>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn get_semesters(
    State(state): State<AppState>,
) -> Result<Json<Vec<SemesterWithYear>>, AppError> {
    let semesters = SemesterService::get_semesters(&state.db).await?;
    Ok(Json(semesters))
}

#[utoipa::path(
    get,
    path = "/api/semesters/current",
    responses(
        (status = 200, description = "Current semester", body = SemesterWithYear),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "No current semester", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn get_current_semester(
    State(state): State<AppState>,
) -> Result<Json<SemesterWithYear>, AppError> {
    let semester = SemesterService::get_current_semester(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No current semester is set")))?;
    Ok(Json(semester))
}

#[utoipa::path(
    get,
    path = "/api/semesters/{id}",
    params(("id" = SemesterId, Path, description = "Semester ID")),
    responses(
        (status = 200, description = "Semester details", body = SemesterWithYear),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Semester not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn get_semester(
    State(state): State<AppState>,
    Path(id): Path<SemesterId>,
) -> Result<Json<SemesterWithYear>, AppError> {
    let semester = SemesterService::get_semester_by_id(&state.db, id).await?;
    Ok(Json(semester))
}

#[utoipa::path(
    put,
    path = "/api/semesters/{id}",
    params(("id" = SemesterId, Path, description = "Semester ID")),
    request_body = UpdateSemesterDto,
    responses(
        (status = 200, description = "Semester updated successfully", body = Semester),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Semester not found", body = ErrorResponse),
        (status = 409, description = "Duplicate name within the year", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state, dto))]
pub async fn update_semester(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<SemesterId>,
    ValidatedJson(dto): ValidatedJson<UpdateSemesterDto>,
) -> Result<Json<Semester>, AppError> {
    let semester = SemesterService::update_semester(&state.db, id, dto).await?;
    Ok(Json(semester))
}

#[utoipa::path(
    delete,
    path = "/api/semesters/{id}",
    params(("id" = SemesterId, Path, description = "Semester ID")),
    responses(
        (status = 200, description = "Semester deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Semester not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Semesters"
)]
#[instrument(skip(state))]
pub async fn delete_semester(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<SemesterId>,
) -> Result<Json<serde_json::Value>, AppError> {
    SemesterService::delete_semester(&state.db, id).await?;
    Ok(Json(json!({"message": "Semester deleted successfully"})))
}
