use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::{Role, User};
use crate::utils::validation::{validate_password, NAME_RE, PHONE_RE};

/// POST /users
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(regex(path = "NAME_RE", message = "Name must start with a letter and be 2-50 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(regex(path = "PHONE_RE", message = "Phone must be 10 digits starting with 0"))]
    pub phone: Option<String>,
    pub role: Role,
    #[validate(custom = "validate_password")]
    pub password: String,
}

/// PATCH /users/:id. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(regex(path = "NAME_RE", message = "Name must start with a letter and be 2-50 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(regex(path = "PHONE_RE", message = "Phone must be 10 digits starting with 0"))]
    pub phone: Option<String>,
    pub active: Option<bool>,
    #[validate(custom = "validate_password")]
    pub password: Option<String>,
}

/// PATCH /users/:id/role
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserFilters {
    pub role: Option<Role>,
    pub active: Option<bool>,
    /// Matches name or email
    pub search: Option<String>,
}

/// User without the password hash
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
