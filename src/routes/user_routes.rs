use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::controllers::user_controller::UserController;
use crate::dto::user_dto::{CreateUserRequest, UpdateRoleRequest, UpdateUserRequest, UserFilters};
use crate::dto::{MessageResponse, Pagination};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_user_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/technicians", get(list_technicians))
        .route("/users/:id", get(get_user).patch(update_user).delete(delete_user))
        .route("/users/:id/role", patch(update_role))
}

async fn list_users(
    State(state): State<AppState>,
    Query(filters): Query<UserFilters>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let users = controller.list(filters, page).await?;
    Ok(Json(json!({ "users": users })))
}

async fn list_technicians(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let users = controller.technicians().await?;
    Ok(Json(json!({ "users": users })))
}

async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let controller = UserController::new(state.pool.clone());
    let user = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let user = controller.get(id).await?;
    Ok(Json(json!({ "user": user })))
}

async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let user = controller.update(actor.user_id, id, request).await?;
    Ok(Json(json!({ "user": user })))
}

async fn update_role(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<Value>, AppError> {
    let controller = UserController::new(state.pool.clone());
    let user = controller.update_role(actor.user_id, id, request).await?;
    Ok(Json(json!({ "user": user })))
}

async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = UserController::new(state.pool.clone());
    controller.delete(actor.user_id, id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}
