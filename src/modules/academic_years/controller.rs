use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::instrument;

use crate::middleware::role::RequireAdmin;
use crate::modules::academic_years::model::{
    AcademicYear, CreateAcademicYearDto, UpdateAcademicYearDto,
};
use crate::modules::academic_years::service::AcademicYearService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;
use markbook_core::AppError;
use markbook_models::ids::AcademicYearId;

#[utoipa::path(
    post,
    path = "/api/academic-years",
    request_body = CreateAcademicYearDto,
    responses(
        (status = 200, description = "Academic year created successfully", body = AcademicYear),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 409, description = "Duplicate name", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
#[instrument(skip(state, dto))]
pub async fn create_academic_year(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateAcademicYearDto>,
) -> Result<Json<AcademicYear>, AppError> {
    let year = AcademicYearService::create_academic_year(&state.db, dto).await?;
    Ok(Json(year))
}

#[utoipa::path(
    get,
    path = "/api/academic-years",
    responses(
        (status = 200, description = "List of academic years", body = Vec<AcademicYear>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn get_academic_years(
    State(state): State<AppState>,
) -> Result<Json<Vec<AcademicYear>>, AppError> {
    let years = AcademicYearService::get_academic_years(&state.db).await?;
    Ok(Json(years))
}

#[utoipa::path(
    get,
    path = "/api/academic-years/current",
    responses(
        (status = 200, description = "Current academic year", body = AcademicYear),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "No current academic year", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn get_current_academic_year(
    State(state): State<AppState>,
) -> Result<Json<AcademicYear>, AppError> {
    let year = AcademicYearService::get_current_academic_year(&state.db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No current academic year is set")))?;
    Ok(Json(year))
}

#[utoipa::path(
    get,
    path = "/api/academic-years/{id}",
    params(("id" = AcademicYearId, Path, description = "Academic year ID")),
    responses(
        (status = 200, description = "Academic year details", body = AcademicYear),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Academic year not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn get_academic_year(
    State(state): State<AppState>,
    Path(id): Path<AcademicYearId>,
) -> Result<Json<AcademicYear>, AppError> {
    let year = AcademicYearService::get_academic_year_by_id(&state.db, id).await?;
    Ok(Json(year))
}

#[utoipa::path(
    put,
    path = "/api/academic-years/{id}",
    params(("id" = AcademicYearId, Path, description = "Academic year ID")),
    request_body = UpdateAcademicYearDto,
    responses(
        (status = 200, description = "Academic year updated successfully", body = AcademicYear),
        (status = 400, description = "Invalid date range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Academic year not found", body = ErrorResponse),
        (status = 409, description = "Duplicate name", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
#[instrument(skip(state, dto))]
pub async fn update_academic_year(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<AcademicYearId>,
    ValidatedJson(dto): ValidatedJson<UpdateAcademicYearDto>,
) -> Result<Json<AcademicYear>, AppError> {
    let year = AcademicYearService::update_academic_year(&state.db, id, dto).await?;
    Ok(Json(year))
}

#[utoipa::path(
    delete,
    path = "/api/academic-years/{id}",
    params(("id" = AcademicYearId, Path, description = "Academic year ID")),
    responses(
        (status = 200, description = "Academic year deleted successfully"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Academic year not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Academic Years"
)]
#[instrument(skip(state))]
pub async fn delete_academic_year(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<AcademicYearId>,
) -> Result<Json<serde_json::Value>, AppError> {
    AcademicYearService::delete_academic_year(&state.db, id).await?;
    Ok(Json(json!({"message": "Academic year deleted successfully"})))
}
