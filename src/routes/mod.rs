//! HTTP routes
//!
//! Each module exposes a `create_*_router` returning full paths; they are
//! merged here under the authentication and authorization layers.

pub mod auth_routes;
pub mod booking_routes;
pub mod goods_request_routes;
pub mod inventory_routes;
pub mod invoice_routes;
pub mod job_routes;
pub mod leave_routes;
pub mod user_routes;

use std::time::Duration;

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::middleware::auth::{authenticate, authorize};
use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

/// Build the full application router
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth_routes::create_auth_router())
        .merge(user_routes::create_user_router())
        .merge(booking_routes::create_booking_router())
        .merge(job_routes::create_job_router())
        .merge(inventory_routes::create_inventory_router())
        .merge(goods_request_routes::create_goods_request_router())
        .merge(invoice_routes::create_invoice_router())
        .merge(leave_routes::create_leave_router())
        // authenticate is added last so it runs before authorize
        .route_layer(middleware::from_fn(authorize))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let cors = if state.config.is_development() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(&state.config.cors_origins)
    };
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/health", get(health))
        .merge(auth_routes::create_public_auth_router(state.clone()))
        .merge(protected)
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
