use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::controllers::job_controller::JobController;
use crate::dto::job_dto::{AssignJobRequest, CreateJobRequest, JobFilters};
use crate::dto::{MessageResponse, Pagination, StatusRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::job::JobStatus;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_job_router() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/:id", get(get_job).delete(delete_job))
        .route("/jobs/:id/assign", patch(assign_job))
        .route("/jobs/:id/status", patch(update_status))
}

async fn list_jobs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<JobFilters>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let controller = JobController::new(state.pool.clone());
    let jobs = controller.list(&user, filters, page).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let controller = JobController::new(state.pool.clone());
    let job = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

async fn get_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let controller = JobController::new(state.pool.clone());
    let job = controller.get(&user, id).await?;
    Ok(Json(json!({ "job": job })))
}

async fn assign_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignJobRequest>,
) -> Result<Json<Value>, AppError> {
    let controller = JobController::new(state.pool.clone());
    let job = controller.assign(id, request).await?;
    Ok(Json(json!({ "job": job })))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusRequest<JobStatus>>,
) -> Result<Json<Value>, AppError> {
    let controller = JobController::new(state.pool.clone());
    let job = controller.update_status(&user, id, request.status).await?;
    Ok(Json(json!({ "job": job })))
}

async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = JobController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(MessageResponse::new("Job deleted")))
}
