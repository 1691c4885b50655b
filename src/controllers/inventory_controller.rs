use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::inventory_dto::{
    CreateItemRequest, InventoryFilters, InventoryItemResponse, StockAdjustmentRequest, UpdateItemRequest,
};
use crate::dto::Pagination;
use crate::models::inventory::apply_stock_delta;
use crate::repositories::inventory_repository::InventoryRepository;
use crate::utils::errors::{not_found_error, AppError};

pub struct InventoryController {
    repository: InventoryRepository,
}

impl InventoryController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InventoryRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: InventoryFilters, page: Pagination) -> Result<Vec<InventoryItemResponse>, AppError> {
        let items = self.repository.list(&filters, page).await?;
        Ok(items.into_iter().map(InventoryItemResponse::from).collect())
    }

    pub async fn low_stock(&self) -> Result<Vec<InventoryItemResponse>, AppError> {
        let items = self.repository.low_stock().await?;
        Ok(items.into_iter().map(InventoryItemResponse::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<InventoryItemResponse, AppError> {
        let item = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Inventory item", &id.to_string()))?;

        Ok(item.into())
    }

    pub async fn create(&self, request: CreateItemRequest) -> Result<InventoryItemResponse, AppError> {
        request.validate()?;
        let item = self.repository.create(&request).await?;

        info!(item_id = %item.id, sku = %item.sku, "📦 inventory item created");
        Ok(item.into())
    }

    pub async fn update(&self, id: Uuid, request: UpdateItemRequest) -> Result<InventoryItemResponse, AppError> {
        request.validate()?;
        let item = self
            .repository
            .update(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Inventory item", &id.to_string()))?;

        Ok(item.into())
    }

    pub async fn adjust_stock(&self, id: Uuid, request: StockAdjustmentRequest) -> Result<InventoryItemResponse, AppError> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Inventory item", &id.to_string()))?;

        apply_stock_delta(current.quantity, request.delta)?;

        // stock may have moved since the read
        let item = self.repository.adjust(id, request.delta).await?.ok_or_else(|| {
            warn!(item_id = %id, delta = request.delta, "stock adjustment lost a race");
            AppError::Conflict("Insufficient stock for this adjustment".to_string())
        })?;

        info!(
            item_id = %id,
            delta = request.delta,
            quantity = item.quantity,
            reason = request.reason.as_deref().unwrap_or("-"),
            "stock adjusted"
        );
        Ok(item.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = match self.repository.delete(id).await {
            Err(AppError::BadRequest(_)) => {
                return Err(AppError::Conflict(
                    "Item is referenced by goods requests and cannot be deleted".to_string(),
                ))
            }
            other => other?,
        };

        if !deleted {
            return Err(not_found_error("Inventory item", &id.to_string()));
        }
        Ok(())
    }
}
