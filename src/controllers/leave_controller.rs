use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::leave_dto::{CreateLeaveRequest, LeaveFilters, LeaveResponse};
use crate::dto::Pagination;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::leave_request::{LeaveRequest, LeaveStatus};
use crate::models::Lifecycle;
use crate::repositories::leave_repository::LeaveRepository;
use crate::utils::errors::{forbidden_error, not_found_error, AppError};

pub struct LeaveController {
    repository: LeaveRepository,
}

impl LeaveController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: LeaveRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        filters: LeaveFilters,
        page: Pagination,
    ) -> Result<Vec<LeaveResponse>, AppError> {
        let employee = filters.scope(actor.user_id, actor.is_supervisor());
        let leaves = self.repository.list(filters.status, employee, page).await?;
        Ok(leaves.into_iter().map(LeaveResponse::from).collect())
    }

    pub async fn get(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<LeaveResponse, AppError> {
        let leave = self.find_visible(actor, id).await?;
        Ok(leave.into())
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateLeaveRequest,
        today: NaiveDate,
    ) -> Result<LeaveResponse, AppError> {
        request.validate()?;
        request.check_dates(today)?;

        let leave = self.repository.create(&request, actor.user_id).await?;

        info!(leave_id = %leave.id, employee = %actor.user_id, days = leave.days(), "leave requested");
        Ok(leave.into())
    }

    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        status: LeaveStatus,
    ) -> Result<LeaveResponse, AppError> {
        let leave = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Leave request", &id.to_string()))?;

        if leave.employee_id == actor.user_id {
            return Err(forbidden_error("review leave", "you cannot review your own request"));
        }

        let next = leave.status.transition(status)?;
        let updated = self
            .repository
            .update_status(id, leave.status, next, actor.user_id)
            .await?
            .ok_or_else(|| AppError::Conflict("Leave request was already reviewed".to_string()))?;

        info!(leave_id = %id, to = %next, reviewer = %actor.user_id, "leave reviewed");
        Ok(updated.into())
    }

    /// Supervisors may delete any request; owners only while it is pending
    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<(), AppError> {
        let leave = self.find_visible(actor, id).await?;

        if !actor.is_supervisor() && leave.status != LeaveStatus::Pending {
            return Err(AppError::Conflict(format!(
                "A leave request that is {} can no longer be withdrawn",
                leave.status
            )));
        }

        if !self.repository.delete(id).await? {
            return Err(not_found_error("Leave request", &id.to_string()));
        }
        Ok(())
    }

    async fn find_visible(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<LeaveRequest, AppError> {
        let leave = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Leave request", &id.to_string()))?;

        if !actor.is_supervisor() && leave.employee_id != actor.user_id {
            return Err(forbidden_error("access leave request", "it belongs to another employee"));
        }
        Ok(leave)
    }
}
