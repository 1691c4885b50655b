use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::job_dto::JobFilters;
use crate::dto::Pagination;
use crate::models::job::{Job, JobStatus};
use crate::utils::errors::AppError;

pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        booking_id: Uuid,
        title: &str,
        description: Option<&str>,
        technicians: &[Uuid],
    ) -> Result<Job, AppError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (id, booking_id, title, description, technicians)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(title)
        .bind(description)
        .bind(technicians)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(job)
    }

    /// `assigned_to` narrows the list to one technician's jobs
    pub async fn list(
        &self,
        filters: &JobFilters,
        assigned_to: Option<Uuid>,
        page: Pagination,
    ) -> Result<Vec<Job>, AppError> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT * FROM jobs
            WHERE ($1::job_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR booking_id = $2)
              AND ($3::uuid IS NULL OR $3 = ANY(technicians))
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filters.status)
        .bind(filters.booking_id)
        .bind(assigned_to)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    pub async fn assign(&self, id: Uuid, technicians: &[Uuid]) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET technicians = $2, updated_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'in_progress')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(technicians)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    /// Compare-and-set on status; timestamps are kept when `None`
    pub async fn update_status(
        &self,
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $3,
                started_at = COALESCE($4, started_at),
                completed_at = COALESCE($5, completed_at),
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(started_at)
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(job)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
