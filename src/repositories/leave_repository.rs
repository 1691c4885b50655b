use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::leave_dto::CreateLeaveRequest;
use crate::dto::Pagination;
use crate::models::leave_request::{LeaveRequest, LeaveStatus};
use crate::utils::errors::AppError;

pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &CreateLeaveRequest, employee_id: Uuid) -> Result<LeaveRequest, AppError> {
        let leave = sqlx::query_as::<_, LeaveRequest>(
            r#"
            INSERT INTO leave_requests (id, employee_id, leave_type, start_date, end_date, reason)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(employee_id)
        .bind(request.leave_type)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.reason.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(leave)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<LeaveRequest>, AppError> {
        let leave = sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(leave)
    }

    pub async fn list(
        &self,
        status: Option<LeaveStatus>,
        employee_id: Option<Uuid>,
        page: Pagination,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT * FROM leave_requests
            WHERE ($1::leave_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR employee_id = $2)
            ORDER BY start_date DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(status)
        .bind(employee_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(leaves)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        from: LeaveStatus,
        to: LeaveStatus,
        reviewed_by: Uuid,
    ) -> Result<Option<LeaveRequest>, AppError> {
        let leave = sqlx::query_as::<_, LeaveRequest>(
            r#"
            UPDATE leave_requests
            SET status = $3, reviewed_by = $4, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(reviewed_by)
        .fetch_optional(&self.pool)
        .await?;

        Ok(leave)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
