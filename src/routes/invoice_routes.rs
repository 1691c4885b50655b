use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::controllers::invoice_controller::InvoiceController;
use crate::dto::invoice_dto::{CreateInvoiceRequest, InvoiceFilters};
use crate::dto::{MessageResponse, Pagination, StatusRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::invoice::InvoiceStatus;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_invoice_router() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/:id", get(get_invoice).delete(delete_invoice))
        .route("/invoices/:id/status", patch(update_status))
}

async fn list_invoices(
    State(state): State<AppState>,
    Query(filters): Query<InvoiceFilters>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    let invoices = controller.list(filters, page).await?;
    Ok(Json(json!({ "invoices": invoices })))
}

async fn create_invoice(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    let invoice = controller.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "invoice": invoice }))))
}

async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    let invoice = controller.get(id).await?;
    Ok(Json(json!({ "invoice": invoice })))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusRequest<InvoiceStatus>>,
) -> Result<Json<Value>, AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    let invoice = controller.update_status(id, request.status).await?;
    Ok(Json(json!({ "invoice": invoice })))
}

async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = InvoiceController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(MessageResponse::new("Invoice deleted")))
}
