use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::dto::goods_request_dto::{CreateGoodsRequest, GoodsRequestFilters};
use crate::dto::Pagination;
use crate::models::goods_request::{GoodsRequest, GoodsRequestStatus};
use crate::utils::errors::AppError;

pub struct GoodsRequestRepository {
    pool: PgPool,
}

impl GoodsRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn create(&self, request: &CreateGoodsRequest, requested_by: Uuid) -> Result<GoodsRequest, AppError> {
        let created = sqlx::query_as::<_, GoodsRequest>(
            r#"
            INSERT INTO goods_requests (id, job_id, item_id, quantity, requested_by, note)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.job_id)
        .bind(request.item_id)
        .bind(request.quantity)
        .bind(requested_by)
        .bind(request.note.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GoodsRequest>, AppError> {
        let request = sqlx::query_as::<_, GoodsRequest>("SELECT * FROM goods_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(request)
    }

    /// Row-locking read for status changes inside a transaction
    pub async fn find_for_update<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<GoodsRequest>, AppError> {
        let request = sqlx::query_as::<_, GoodsRequest>("SELECT * FROM goods_requests WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(request)
    }

    /// `requested_by` narrows the list to one requester
    pub async fn list(
        &self,
        filters: &GoodsRequestFilters,
        requested_by: Option<Uuid>,
        page: Pagination,
    ) -> Result<Vec<GoodsRequest>, AppError> {
        let requests = sqlx::query_as::<_, GoodsRequest>(
            r#"
            SELECT * FROM goods_requests
            WHERE ($1::goods_request_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR job_id = $2)
              AND ($3::uuid IS NULL OR requested_by = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filters.status)
        .bind(filters.job_id)
        .bind(requested_by)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn set_status<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        status: GoodsRequestStatus,
        reviewed_by: Uuid,
        note: Option<&str>,
    ) -> Result<GoodsRequest, AppError> {
        let updated = sqlx::query_as::<_, GoodsRequest>(
            r#"
            UPDATE goods_requests
            SET status = $2, reviewed_by = $3, note = COALESCE($4, note), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(reviewed_by)
        .bind(note)
        .fetch_one(executor)
        .await?;

        Ok(updated)
    }
}
