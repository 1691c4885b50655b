use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::dto::user_dto::UserResponse;
use crate::models::user::{Role, User};
use crate::repositories::user_repository::{UserChanges, UserRepository};
use crate::services::jwt_service::JwtService;
use crate::services::password::{hash_password, verify_password};
use crate::utils::errors::AppError;
use crate::utils::validation::validate_password;

pub struct AuthController {
    repository: UserRepository,
    jwt: JwtService,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt: JwtService) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(request.password, user.password_hash.clone()).await? {
            warn!(email = %user.email, "failed login attempt");
            return Err(invalid());
        }
        if !user.active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        let (token, expires_at) = self.jwt.generate_token(&user)?;
        info!(user_id = %user.id, role = %user.role, "🔐 login");

        Ok(LoginResponse::bearer(token, expires_at, user.into()))
    }

    /// Current user, re-read so deactivation shows up before the token expires
    pub async fn me(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        let user = self.active_user(user_id).await?;
        Ok(user.into())
    }

    pub async fn change_password(&self, user_id: Uuid, request: ChangePasswordRequest) -> Result<(), AppError> {
        request.validate()?;

        let user = self.active_user(user_id).await?;
        if !verify_password(request.current_password, user.password_hash).await? {
            return Err(AppError::Unauthorized("Current password is incorrect".to_string()));
        }

        let password_hash = hash_password(request.new_password).await?;
        self.repository
            .update(
                user_id,
                UserChanges {
                    password_hash: Some(password_hash),
                    ..Default::default()
                },
            )
            .await?;

        info!(user_id = %user_id, "password changed");
        Ok(())
    }

    /// Create the first admin from `ADMIN_*` settings when no user exists yet
    pub async fn bootstrap_admin(&self, config: &EnvironmentConfig) -> Result<Option<User>, AppError> {
        let (email, password) = match (&config.admin_email, &config.admin_password) {
            (Some(email), Some(password)) => (email, password),
            _ => return Ok(None),
        };

        if self.repository.count().await? > 0 {
            return Ok(None);
        }

        validate_password(password).map_err(|_| {
            AppError::BadRequest("ADMIN_PASSWORD must be at least 8 characters with a letter and a digit".to_string())
        })?;

        let password_hash = hash_password(password.clone()).await?;
        let admin = self
            .repository
            .create(&config.admin_name, email, None, Role::Admin, &password_hash)
            .await?;

        info!(email = %admin.email, "👤 bootstrap admin created");
        Ok(Some(admin))
    }

    async fn active_user(&self, user_id: Uuid) -> Result<User, AppError> {
        match self.repository.find_by_id(user_id).await? {
            Some(user) if user.active => Ok(user),
            _ => Err(AppError::Unauthorized("Account no longer active".to_string())),
        }
    }
}
