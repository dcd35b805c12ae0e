use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireTeacher};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::results::model::{
    BulkTransitionResponse, CreateResultDto, ExamResult, PaginatedResultsResponse,
    PublishResultsDto, ResultFilterParams, ResultWithContext, ReviewResultsDto, UpdateResultDto,
};
use crate::modules::results::service::ResultService;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use markbook_core::AppError;
use markbook_models::ids::ResultId;

#[utoipa::path(
    post,
    path = "/api/results",
    request_body = CreateResultDto,
    responses(
        (status = 200, description = "Draft result created", body = ExamResult),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Teacher only", body = ErrorResponse),
        (status = 404, description = "Exam or student not found", body = ErrorResponse),
        (status = 409, description = "Result already exists for this student and exam", body = ErrorResponse),
        (status = 422, description = "Validation failed or invalid exam configuration", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state, dto))]
pub async fn create_result(
    State(state): State<AppState>,
    _teacher: RequireTeacher,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateResultDto>,
) -> Result<Json<ExamResult>, AppError> {
    let author = auth_user.user_id()?;
    let result = ResultService::create_draft(&state.db, dto, author).await?;
    Ok(Json(result))
}

#[utoipa::path(
    put,
    path = "/api/results/{id}",
    params(("id" = ResultId, Path, description = "Result ID")),
    request_body = UpdateResultDto,
    responses(
        (status = 200, description = "Draft result updated", body = ExamResult),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - owning teacher, draft only", body = ErrorResponse),
        (status = 404, description = "Result not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state, dto))]
pub async fn update_result(
    State(state): State<AppState>,
    _teacher: RequireTeacher,
    auth_user: AuthUser,
    Path(id): Path<ResultId>,
    ValidatedJson(dto): ValidatedJson<UpdateResultDto>,
) -> Result<Json<ExamResult>, AppError> {
    let actor = auth_user.user_id()?;
    let result = ResultService::update_draft(&state.db, id, dto, actor).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/results",
    params(ResultFilterParams),
    responses(
        (status = 200, description = "Results visible to the caller", body = PaginatedResultsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state))]
pub async fn get_results(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<ResultFilterParams>,
) -> Result<Json<PaginatedResultsResponse>, AppError> {
    let actor = auth_user.user_id()?;
    let response = ResultService::list_results(&state.db, actor, auth_user.role(), filters).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/results/{id}",
    params(("id" = ResultId, Path, description = "Result ID")),
    responses(
        (status = 200, description = "Result details", body = ResultWithContext),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Result not found or not visible", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state))]
pub async fn get_result(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<ResultId>,
) -> Result<Json<ResultWithContext>, AppError> {
    let actor = auth_user.user_id()?;
    let result = ResultService::get_result(&state.db, actor, auth_user.role(), id).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/results/publish",
    request_body = PublishResultsDto,
    responses(
        (status = 200, description = "Draft results submitted for approval", body = BulkTransitionResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Teacher only", body = ErrorResponse),
        (status = 404, description = "Exam not found or nothing to publish", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state))]
pub async fn publish_results(
    State(state): State<AppState>,
    _teacher: RequireTeacher,
    auth_user: AuthUser,
    Json(dto): Json<PublishResultsDto>,
) -> Result<Json<BulkTransitionResponse>, AppError> {
    let actor = auth_user.user_id()?;
    let updated = ResultService::publish_results(&state.db, dto.exam_id, actor).await?;
    Ok(Json(BulkTransitionResponse { updated }))
}

#[utoipa::path(
    post,
    path = "/api/results/approve",
    request_body = ReviewResultsDto,
    responses(
        (status = 200, description = "Pending results approved or rejected", body = BulkTransitionResponse),
        (status = 400, description = "Invalid action", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Exam not found or nothing pending", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Results"
)]
#[instrument(skip(state, dto))]
pub async fn review_results(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    auth_user: AuthUser,
    Json(dto): Json<ReviewResultsDto>,
) -> Result<Json<BulkTransitionResponse>, AppError> {
    let actor = auth_user.user_id()?;
    let updated = ResultService::review_results(&state.db, dto, actor).await?;
    Ok(Json(BulkTransitionResponse { updated }))
}
