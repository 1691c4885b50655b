use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::goods_request_dto::{CreateGoodsRequest, GoodsRequestFilters, GoodsRequestResponse};
use crate::dto::{Pagination, StatusRequest};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::goods_request::GoodsRequestStatus;
use crate::models::user::Role;
use crate::models::Lifecycle;
use crate::repositories::goods_request_repository::GoodsRequestRepository;
use crate::repositories::inventory_repository::InventoryRepository;
use crate::repositories::job_repository::JobRepository;
use crate::utils::errors::{forbidden_error, not_found_error, AppError};

pub struct GoodsRequestController {
    repository: GoodsRequestRepository,
    jobs: JobRepository,
    items: InventoryRepository,
}

impl GoodsRequestController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: GoodsRequestRepository::new(pool.clone()),
            jobs: JobRepository::new(pool.clone()),
            items: InventoryRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        filters: GoodsRequestFilters,
        page: Pagination,
    ) -> Result<Vec<GoodsRequestResponse>, AppError> {
        let requested_by = (actor.role == Role::Technician).then_some(actor.user_id);
        let requests = self.repository.list(&filters, requested_by, page).await?;
        Ok(requests.into_iter().map(GoodsRequestResponse::from).collect())
    }

    pub async fn get(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<GoodsRequestResponse, AppError> {
        let request = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Goods request", &id.to_string()))?;

        if actor.role == Role::Technician && request.requested_by != actor.user_id {
            return Err(forbidden_error("access goods request", "it was raised by someone else"));
        }
        Ok(request.into())
    }

    pub async fn create(
        &self,
        actor: &AuthenticatedUser,
        request: CreateGoodsRequest,
    ) -> Result<GoodsRequestResponse, AppError> {
        request.validate()?;

        let job = self
            .jobs
            .find_by_id(request.job_id)
            .await?
            .ok_or_else(|| not_found_error("Job", &request.job_id.to_string()))?;

        if !job.status.is_open() {
            return Err(AppError::Conflict(format!("Cannot request goods for a {} job", job.status)));
        }
        if actor.role == Role::Technician && !job.is_assigned_to(actor.user_id) {
            return Err(forbidden_error("request goods", "you are not assigned to this job"));
        }
        if self.items.find_by_id(request.item_id).await?.is_none() {
            return Err(not_found_error("Inventory item", &request.item_id.to_string()));
        }

        let created = self.repository.create(&request, actor.user_id).await?;

        info!(request_id = %created.id, job_id = %job.id, quantity = created.quantity, "goods requested");
        Ok(created.into())
    }

    /// Approve, reject or release. Releasing takes the stock in the same
    /// transaction as the status change.
    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        request: StatusRequest<GoodsRequestStatus>,
    ) -> Result<GoodsRequestResponse, AppError> {
        let mut tx = self.repository.pool().begin().await?;

        let current = GoodsRequestRepository::find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found_error("Goods request", &id.to_string()))?;

        let next = current.status.transition(request.status)?;

        if next == GoodsRequestStatus::Released {
            InventoryRepository::adjust_stock(&mut *tx, current.item_id, -current.quantity)
                .await?
                .ok_or_else(|| {
                    AppError::Conflict(format!(
                        "Insufficient stock to release {} unit(s)",
                        current.quantity
                    ))
                })?;
        }

        let updated =
            GoodsRequestRepository::set_status(&mut *tx, id, next, actor.user_id, request.note.as_deref()).await?;

        tx.commit().await?;

        info!(request_id = %id, from = %current.status, to = %next, "goods request status changed");
        Ok(updated.into())
    }
}
