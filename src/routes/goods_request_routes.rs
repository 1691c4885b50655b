use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::controllers::goods_request_controller::GoodsRequestController;
use crate::dto::goods_request_dto::{CreateGoodsRequest, GoodsRequestFilters};
use crate::dto::{Pagination, StatusRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::goods_request::GoodsRequestStatus;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_goods_request_router() -> Router<AppState> {
    Router::new()
        .route("/goods-requests", get(list_requests).post(create_request))
        .route("/goods-requests/:id", get(get_request))
        .route("/goods-requests/:id/status", patch(update_status))
}

async fn list_requests(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(filters): Query<GoodsRequestFilters>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let controller = GoodsRequestController::new(state.pool.clone());
    let requests = controller.list(&user, filters, page).await?;
    Ok(Json(json!({ "goods_requests": requests })))
}

async fn create_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateGoodsRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let controller = GoodsRequestController::new(state.pool.clone());
    let created = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "goods_request": created }))))
}

async fn get_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let controller = GoodsRequestController::new(state.pool.clone());
    let request = controller.get(&user, id).await?;
    Ok(Json(json!({ "goods_request": request })))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusRequest<GoodsRequestStatus>>,
) -> Result<Json<Value>, AppError> {
    let controller = GoodsRequestController::new(state.pool.clone());
    let updated = controller.update_status(&user, id, request).await?;
    Ok(Json(json!({ "goods_request": updated })))
}
