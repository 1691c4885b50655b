use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::dto::inventory_dto::{CreateItemRequest, InventoryFilters, UpdateItemRequest};
use crate::dto::Pagination;
use crate::models::inventory::InventoryItem;
use crate::utils::errors::AppError;

pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateItemRequest) -> Result<InventoryItem, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            INSERT INTO inventory_items (id, name, sku, category, quantity, unit_price, reorder_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(&request.sku)
        .bind(request.category.trim())
        .bind(request.quantity)
        .bind(request.unit_price)
        .bind(request.reorder_level)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InventoryItem>, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>("SELECT * FROM inventory_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    pub async fn list(&self, filters: &InventoryFilters, page: Pagination) -> Result<Vec<InventoryItem>, AppError> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT * FROM inventory_items
            WHERE ($1::text IS NULL OR name ILIKE $1 OR sku ILIKE $1)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY name ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filters.search.as_deref().map(|s| format!("%{}%", s.trim())))
        .bind(filters.category.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn low_stock(&self) -> Result<Vec<InventoryItem>, AppError> {
        let items = sqlx::query_as::<_, InventoryItem>(
            "SELECT * FROM inventory_items WHERE quantity <= reorder_level ORDER BY quantity ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn update(&self, id: Uuid, request: &UpdateItemRequest) -> Result<Option<InventoryItem>, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items
            SET name = COALESCE($2, name),
                sku = COALESCE($3, sku),
                category = COALESCE($4, category),
                unit_price = COALESCE($5, unit_price),
                reorder_level = COALESCE($6, reorder_level),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.name.as_deref().map(str::trim))
        .bind(request.sku.as_deref())
        .bind(request.category.as_deref().map(str::trim))
        .bind(request.unit_price)
        .bind(request.reorder_level)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Apply a signed stock movement in one statement. Returns `None` when the
    /// item is missing or the movement would take stock below zero.
    pub async fn adjust_stock<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        delta: i32,
    ) -> Result<Option<InventoryItem>, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items
            SET quantity = quantity + $2, updated_at = NOW()
            WHERE id = $1 AND quantity + $2 >= 0
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(executor)
        .await?;

        Ok(item)
    }

    pub async fn adjust(&self, id: Uuid, delta: i32) -> Result<Option<InventoryItem>, AppError> {
        Self::adjust_stock(&self.pool, id, delta).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
