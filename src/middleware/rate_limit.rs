//! Rate limiting middleware
//!
//! Fixed-window request counting per client address. Used on the login
//! endpoint to slow down password guessing.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

use crate::state::AppState;
use crate::utils::errors::AppError;

#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
}

impl RateLimitState {
    pub fn new(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
        }
    }

    /// Count one request for `key`, failing once the window is full
    pub async fn check_rate_limit(&self, key: &str) -> Result<(), AppError> {
        self.check_at(key, Instant::now()).await
    }

    async fn check_at(&self, key: &str, now: Instant) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;

        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(key.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

/// Client key: the socket peer address. Behind a trusted reverse proxy the
/// right-most `X-Forwarded-For` hop is used instead, since that is the one
/// the proxy appended; anything left of it is client supplied.
fn client_key(request: &Request, trust_proxy: bool) -> String {
    let forwarded = trust_proxy
        .then(|| request.headers().get("x-forwarded-for"))
        .flatten()
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.rsplit(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty());

    forwarded
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Login rate limiting middleware
pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request, state.config.trust_proxy);

    if let Err(e) = state.login_limiter.check_rate_limit(&key).await {
        warn!(client = %key, "login rate limit exceeded");
        return Err(e);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn login_request(forwarded_for: Option<&str>, peer: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/auth/login");
        if let Some(value) = forwarded_for {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        if let Some(peer) = peer {
            let addr: SocketAddr = peer.parse().unwrap();
            request.extensions_mut().insert(ConnectInfo(addr));
        }
        request
    }

    #[test]
    fn test_client_key_ignores_forwarded_header_by_default() {
        let request = login_request(Some("203.0.113.7"), Some("198.51.100.4:51234"));
        assert_eq!(client_key(&request, false), "198.51.100.4");
    }

    #[test]
    fn test_client_key_uses_proxy_appended_hop() {
        let request = login_request(Some("1.2.3.4, 203.0.113.7"), Some("10.0.0.2:443"));
        assert_eq!(client_key(&request, true), "203.0.113.7");

        let request = login_request(None, Some("10.0.0.2:443"));
        assert_eq!(client_key(&request, true), "10.0.0.2");
    }

    #[test]
    fn test_client_key_without_peer() {
        assert_eq!(client_key(&login_request(None, None), false), "unknown");
    }

    #[tokio::test]
    async fn test_limit_within_window() {
        let limiter = RateLimitState::new(2, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("10.0.0.1", now).await.is_ok());
        assert!(limiter.check_at("10.0.0.1", now).await.is_ok());
        assert!(matches!(
            limiter.check_at("10.0.0.1", now).await,
            Err(AppError::RateLimitExceeded)
        ));
        // other clients are unaffected
        assert!(limiter.check_at("10.0.0.2", now).await.is_ok());
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimitState::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("10.0.0.1", start).await.is_ok());
        assert!(limiter.check_at("10.0.0.1", start).await.is_err());
        assert!(limiter
            .check_at("10.0.0.1", start + Duration::from_secs(61))
            .await
            .is_ok());
    }
}
