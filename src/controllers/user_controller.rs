use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::user_dto::{CreateUserRequest, UpdateRoleRequest, UpdateUserRequest, UserFilters, UserResponse};
use crate::dto::Pagination;
use crate::models::user::Role;
use crate::repositories::user_repository::{UserChanges, UserRepository};
use crate::services::password::hash_password;
use crate::utils::errors::{conflict_error, forbidden_error, not_found_error, AppError};

pub struct UserController {
    repository: UserRepository,
}

impl UserController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: UserFilters, page: Pagination) -> Result<Vec<UserResponse>, AppError> {
        let users = self.repository.list(&filters, page).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn technicians(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.repository.list_technicians().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<UserResponse, AppError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string()))?;

        Ok(user.into())
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        if self.repository.email_exists(&request.email).await? {
            return Err(conflict_error("User", "email", &request.email));
        }

        let password_hash = hash_password(request.password).await?;
        let user = self
            .repository
            .create(
                request.name.trim(),
                &request.email,
                request.phone.as_deref(),
                request.role,
                &password_hash,
            )
            .await?;

        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user.into())
    }

    pub async fn update(&self, actor: Uuid, id: Uuid, request: UpdateUserRequest) -> Result<UserResponse, AppError> {
        request.validate()?;

        if actor == id && request.active == Some(false) {
            return Err(forbidden_error("deactivate user", "you cannot deactivate your own account"));
        }

        let password_hash = match request.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        let user = self
            .repository
            .update(
                id,
                UserChanges {
                    name: request.name.map(|n| n.trim().to_string()),
                    email: request.email,
                    phone: request.phone,
                    active: request.active,
                    password_hash,
                },
            )
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string()))?;

        Ok(user.into())
    }

    pub async fn update_role(&self, actor: Uuid, id: Uuid, request: UpdateRoleRequest) -> Result<UserResponse, AppError> {
        if actor == id && request.role != Role::Admin {
            return Err(forbidden_error("change role", "you cannot demote yourself"));
        }

        let user = self
            .repository
            .update_role(id, request.role)
            .await?
            .ok_or_else(|| not_found_error("User", &id.to_string()))?;

        info!(user_id = %user.id, role = %user.role, "role changed");
        Ok(user.into())
    }

    pub async fn delete(&self, actor: Uuid, id: Uuid) -> Result<(), AppError> {
        if actor == id {
            return Err(forbidden_error("delete user", "you cannot delete your own account"));
        }

        let deleted = match self.repository.delete(id).await {
            Err(AppError::BadRequest(_)) => {
                return Err(AppError::Conflict(
                    "User has bookings or other records; deactivate the account instead".to_string(),
                ))
            }
            other => other?,
        };

        if !deleted {
            return Err(not_found_error("User", &id.to_string()));
        }
        Ok(())
    }
}
