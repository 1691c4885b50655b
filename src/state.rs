//! Shared application state
//!
//! Cloned into every axum handler and middleware.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::services::jwt_service::JwtService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<EnvironmentConfig>,
    pub jwt: JwtService,
    pub login_limiter: RateLimitState,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration);
        let login_limiter = RateLimitState::new(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_window),
        );

        Self {
            pool,
            config: Arc::new(config),
            jwt,
            login_limiter,
        }
    }
}
