use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::job_dto::{AssignJobRequest, CreateJobRequest, JobFilters, JobResponse};
use crate::dto::Pagination;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::BookingStatus;
use crate::models::job::{Job, JobStatus};
use crate::models::user::Role;
use crate::models::Lifecycle;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::job_repository::JobRepository;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{forbidden_error, not_found_error, AppError};

pub struct JobController {
    repository: JobRepository,
    bookings: BookingRepository,
    users: UserRepository,
}

impl JobController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: JobRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        actor: &AuthenticatedUser,
        filters: JobFilters,
        page: Pagination,
    ) -> Result<Vec<JobResponse>, AppError> {
        let assigned_to = if actor.role == Role::Technician {
            Some(actor.user_id)
        } else {
            filters.technician_id
        };

        let jobs = self.repository.list(&filters, assigned_to, page).await?;
        Ok(jobs.into_iter().map(JobResponse::from).collect())
    }

    pub async fn get(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<JobResponse, AppError> {
        let job = self.find_visible(actor, id).await?;
        Ok(job.into())
    }

    pub async fn create(&self, request: CreateJobRequest) -> Result<JobResponse, AppError> {
        request.validate()?;

        let booking = self
            .bookings
            .find_by_id(request.booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &request.booking_id.to_string()))?;

        if matches!(booking.status, BookingStatus::Cancelled | BookingStatus::Completed) {
            return Err(AppError::Conflict(format!(
                "Cannot open a job for a {} booking",
                booking.status
            )));
        }

        let technicians = dedupe(request.technicians);
        self.ensure_technicians(&technicians).await?;

        let job = self
            .repository
            .create(
                booking.id,
                request.title.trim(),
                request.description.as_deref(),
                &technicians,
            )
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::Conflict("This booking already has an open job".to_string()),
                other => other,
            })?;

        info!(job_id = %job.id, booking_id = %booking.id, "🔧 job created");
        Ok(job.into())
    }

    pub async fn assign(&self, id: Uuid, request: AssignJobRequest) -> Result<JobResponse, AppError> {
        request.validate()?;

        let technicians = dedupe(request.technicians);
        self.ensure_technicians(&technicians).await?;

        match self.repository.assign(id, &technicians).await? {
            Some(job) => {
                info!(job_id = %id, count = technicians.len(), "technicians assigned");
                Ok(job.into())
            }
            None => {
                let job = self
                    .repository
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| not_found_error("Job", &id.to_string()))?;
                Err(AppError::Conflict(format!("Cannot assign technicians to a {} job", job.status)))
            }
        }
    }

    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        status: JobStatus,
    ) -> Result<JobResponse, AppError> {
        let job = self.find_visible(actor, id).await?;
        let next = job.status.transition(status)?;

        let now = Utc::now();
        let started_at = (next == JobStatus::InProgress).then_some(now);
        let completed_at = (next == JobStatus::Completed).then_some(now);

        let updated = self
            .repository
            .update_status(id, job.status, next, started_at, completed_at)
            .await?
            .ok_or_else(|| AppError::Conflict("Job was modified concurrently, reload and retry".to_string()))?;

        info!(job_id = %id, from = %job.status, to = %next, by = %actor.user_id, "job status changed");
        Ok(updated.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = match self.repository.delete(id).await {
            Err(AppError::BadRequest(_)) => {
                return Err(AppError::Conflict("Job has invoices and cannot be deleted".to_string()))
            }
            other => other?,
        };

        if !deleted {
            return Err(not_found_error("Job", &id.to_string()));
        }
        Ok(())
    }

    /// Technicians only see jobs they are assigned to
    async fn find_visible(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<Job, AppError> {
        let job = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Job", &id.to_string()))?;

        if actor.role == Role::Technician && !job.is_assigned_to(actor.user_id) {
            return Err(forbidden_error("access job", "you are not assigned to this job"));
        }
        Ok(job)
    }

    async fn ensure_technicians(&self, technicians: &[Uuid]) -> Result<(), AppError> {
        if technicians.is_empty() {
            return Ok(());
        }
        let found = self.users.count_active_technicians(technicians).await?;
        if found != technicians.len() as i64 {
            return Err(AppError::BadRequest(
                "Every assignee must be an active technician".to_string(),
            ));
        }
        Ok(())
    }
}

fn dedupe(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    ids.sort();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_technicians() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = dedupe(vec![a, b, a, b, a]);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a) && ids.contains(&b));
    }
}
