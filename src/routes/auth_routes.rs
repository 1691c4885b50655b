use axum::{
    extract::State,
    middleware,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::dto::MessageResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::rate_limit::login_rate_limit;
use crate::services::authorization_service;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// `POST /auth/login`, open to anonymous callers and rate limited
pub fn create_public_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route_layer(middleware::from_fn_with_state(state, login_rate_limit))
}

/// Routes for an already authenticated user
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/password", patch(change_password))
        .route("/auth/roles", get(roles))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.jwt.clone());
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Value>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.jwt.clone());
    let response = controller.me(user.user_id).await?;
    Ok(Json(json!({ "user": response })))
}

async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.jwt.clone());
    controller.change_password(user.user_id, request).await?;
    Ok(Json(MessageResponse::new("Password updated")))
}

/// Roles and the routes each one reaches
async fn roles() -> Json<Value> {
    Json(json!({ "roles": authorization_service::role_summaries() }))
}
