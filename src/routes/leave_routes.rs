use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::controllers::leave_controller::LeaveController;
use crate::dto::leave_dto::{CreateLeaveRequest, LeaveFilters};
use crate::dto::{MessageResponse, Pagination, StatusRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::leave_request::LeaveStatus;
use crate::services::time_slots::shop_now;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_leave_router() -> Router<AppState> {
    Router::new()
        .route("/leave-requests", get(list_leaves).post(create_leave))
        .route("/leave-requests/:id", get(get_leave).delete(delete_leave))
        .route("/leave-requests/:id/status", patch(update_status))
}

async fn list_leaves(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<LeaveFilters>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let controller = LeaveController::new(state.pool.clone());
    let leaves = controller.list(&user, filters, page).await?;
    Ok(Json(json!({ "leave_requests": leaves })))
}

async fn create_leave(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateLeaveRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let controller = LeaveController::new(state.pool.clone());
    let leave = controller.create(&user, request, shop_now().date()).await?;
    Ok((StatusCode::CREATED, Json(json!({ "leave_request": leave }))))
}

async fn get_leave(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let controller = LeaveController::new(state.pool.clone());
    let leave = controller.get(&user, id).await?;
    Ok(Json(json!({ "leave_request": leave })))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusRequest<LeaveStatus>>,
) -> Result<Json<Value>, AppError> {
    let controller = LeaveController::new(state.pool.clone());
    let leave = controller.update_status(&user, id, request.status).await?;
    Ok(Json(json!({ "leave_request": leave })))
}

async fn delete_leave(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = LeaveController::new(state.pool.clone());
    controller.delete(&user, id).await?;
    Ok(Json(MessageResponse::new("Leave request deleted")))
}
