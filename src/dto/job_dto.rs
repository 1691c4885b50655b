use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::job::{Job, JobStatus};

/// POST /jobs
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    pub booking_id: Uuid,
    #[validate(length(min = 2, max = 100, message = "Title must be 2-100 characters"))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[serde(default)]
    pub technicians: Vec<Uuid>,
}

/// PATCH /jobs/:id/assign replaces the technician list
#[derive(Debug, Deserialize, Validate)]
pub struct AssignJobRequest {
    #[validate(length(min = 1, message = "Assign at least one technician"))]
    pub technicians: Vec<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct JobFilters {
    pub status: Option<JobStatus>,
    pub booking_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub technicians: Vec<Uuid>,
    pub status: JobStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            booking_id: job.booking_id,
            title: job.title,
            description: job.description,
            technicians: job.technicians,
            status: job.status,
            started_at: job.started_at,
            completed_at: job.completed_at,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}
