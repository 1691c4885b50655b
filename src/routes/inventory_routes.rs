use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::controllers::inventory_controller::InventoryController;
use crate::dto::inventory_dto::{CreateItemRequest, InventoryFilters, StockAdjustmentRequest, UpdateItemRequest};
use crate::dto::{MessageResponse, Pagination};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_inventory_router() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_items).post(create_item))
        .route("/inventory/low-stock", get(low_stock))
        .route("/inventory/:id", get(get_item).patch(update_item).delete(delete_item))
        .route("/inventory/:id/stock", patch(adjust_stock))
}

async fn list_items(
    State(state): State<AppState>,
    Query(filters): Query<InventoryFilters>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    let items = controller.list(filters, page).await?;
    Ok(Json(json!({ "items": items })))
}

async fn low_stock(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    let items = controller.low_stock().await?;
    Ok(Json(json!({ "items": items })))
}

async fn create_item(
    State(state): State<AppState>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let controller = InventoryController::new(state.pool.clone());
    let item = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "item": item }))))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    let item = controller.get(id).await?;
    Ok(Json(json!({ "item": item })))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<Value>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    let item = controller.update(id, request).await?;
    Ok(Json(json!({ "item": item })))
}

async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StockAdjustmentRequest>,
) -> Result<Json<Value>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    let item = controller.adjust_stock(id, request).await?;
    Ok(Json(json!({ "item": item })))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = InventoryController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(MessageResponse::new("Inventory item deleted")))
}
