//! Authentication and authorization middleware
//!
//! `authenticate` turns a bearer token into an `AuthenticatedUser` request
//! extension. The token only identifies the account: role and active flag
//! are read from the database on every request, so role changes and
//! deactivation apply immediately. `authorize` then checks that role against
//! the route table in `services::authorization_service`.

use axum::{
    extract::{MatchedPath, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    models::user::Role,
    repositories::user_repository::UserRepository,
    services::authorization_service,
    state::AppState,
    utils::errors::AppError,
};

/// Identity injected into requests that passed `authenticate`
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_supervisor(&self) -> bool {
        self.role.is_supervisor()
    }
}

/// Pull the token out of `Authorization: Bearer <token>`
pub fn extract_bearer_token(value: &str) -> Result<&str, AppError> {
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Authorization header must start with 'Bearer '".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized("Token cannot be empty".to_string()));
    }
    Ok(token)
}

/// JWT authentication middleware
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;

    let token = extract_bearer_token(header_value)?;
    let claims = state.jwt.validate_token(token)?;

    let user = UserRepository::new(state.pool.clone())
        .find_by_id(claims.sub)
        .await?
        .filter(|user| user.active)
        .ok_or_else(|| AppError::Unauthorized("Account not found or deactivated".to_string()))?;

    if user.role != claims.role {
        debug!(user_id = %user.id, token_role = %claims.role, role = %user.role, "role changed since token was issued");
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: user.id,
        email: user.email,
        role: user.role,
    });

    Ok(next.run(request).await)
}

/// Role check against the static route table. Must run after `authenticate`.
pub async fn authorize(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    let pattern = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str())
        .unwrap_or_else(|| request.uri().path());

    if !authorization_service::is_allowed(request.method(), pattern, user.role) {
        debug!(role = %user.role, method = %request.method(), path = pattern, "route denied");
        return Err(AppError::Forbidden(format!(
            "Role '{}' is not allowed to access {} {}",
            user.role,
            request.method(),
            pattern
        )));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    fn guarded(user: Option<AuthenticatedUser>) -> Router {
        let router = Router::new()
            .route("/users", get(|| async { "ok" }))
            .route("/auth/roles", get(|| async { "ok" }))
            .route_layer(middleware::from_fn(authorize));
        match user {
            Some(user) => router.layer(Extension(user)),
            None => router,
        }
    }

    fn as_role(role: Role) -> Option<AuthenticatedUser> {
        Some(AuthenticatedUser {
            user_id: Uuid::new_v4(),
            email: "staff@pitstop.lk".to_string(),
            role,
        })
    }

    async fn status_for(user: Option<AuthenticatedUser>, uri: &str) -> StatusCode {
        let request = axum::http::Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        guarded(user).oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_authorize_uses_role_from_extension() {
        assert_eq!(status_for(as_role(Role::Technician), "/users").await, StatusCode::FORBIDDEN);
        assert_eq!(status_for(as_role(Role::Manager), "/users").await, StatusCode::OK);
        assert_eq!(status_for(as_role(Role::Manager), "/auth/roles").await, StatusCode::FORBIDDEN);
        assert_eq!(status_for(as_role(Role::Admin), "/auth/roles").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_authorize_without_identity_is_unauthorized() {
        assert_eq!(status_for(None, "/users").await, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_bearer_token("Basic dXNlcjpwYXNz").is_err());
        assert!(extract_bearer_token("Bearer   ").is_err());
        assert!(extract_bearer_token("abc.def.ghi").is_err());
    }
}
