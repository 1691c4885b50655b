use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{
    BookingFilters, CreateBookingRequest, SlotQuery, UpdateBookingRequest, ValidateQuery,
};
use crate::dto::{MessageResponse, Pagination, StatusRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::BookingStatus;
use crate::services::booking_wizard::BookingDraft;
use crate::services::time_slots::shop_now;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/slots", get(list_slots))
        .route("/bookings/validate", post(validate_draft))
        .route("/bookings/:id", get(get_booking).patch(update_booking).delete(delete_booking))
        .route("/bookings/:id/status", patch(update_status))
}

fn controller(state: &AppState) -> BookingController {
    BookingController::new(state.pool.clone(), state.config.booking_slot_capacity)
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(filters): Query<BookingFilters>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let bookings = controller(&state).list(filters, page).await?;
    Ok(Json(json!({ "bookings": bookings })))
}

async fn list_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<Value>, AppError> {
    let now = shop_now();
    let date = query.date.unwrap_or_else(|| now.date());
    let slots = controller(&state).slots(date, now).await?;
    Ok(Json(json!({ "date": date, "slots": slots })))
}

async fn validate_draft(
    State(state): State<AppState>,
    Query(query): Query<ValidateQuery>,
    Json(draft): Json<BookingDraft>,
) -> Result<Json<Value>, AppError> {
    let validation = controller(&state).validate(&draft, query.step, shop_now())?;
    Ok(Json(json!({ "validation": validation })))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(draft): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let booking = controller(&state).create(user.user_id, draft, shop_now()).await?;
    Ok((StatusCode::CREATED, Json(json!({ "booking": booking }))))
}

async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking = controller(&state).get(id).await?;
    Ok(Json(json!({ "booking": booking })))
}

async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<Value>, AppError> {
    let booking = controller(&state).update(id, request, shop_now()).await?;
    Ok(Json(json!({ "booking": booking })))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusRequest<BookingStatus>>,
) -> Result<Json<Value>, AppError> {
    let booking = controller(&state).update_status(id, request.status).await?;
    Ok(Json(json!({ "booking": booking })))
}

async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    controller(&state).delete(id).await?;
    Ok(Json(MessageResponse::new("Booking deleted")))
}
