//! Job model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::status::{display_as_str, Lifecycle};

/// Job status - maps to the `job_status` ENUM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::InProgress)
    }
}

display_as_str!(JobStatus);

impl Lifecycle for JobStatus {
    fn can_transition_to(&self, next: Self) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress) | (InProgress, Completed) | (Pending, Cancelled) | (InProgress, Cancelled)
        )
    }
}

/// Job row - maps to the jobs table
#[derive(Debug, Clone, FromRow)]
pub struct Job {
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

impl Job {
    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.technicians.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_transitions() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::InProgress));
        assert!(JobStatus::InProgress.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::InProgress.can_transition_to(JobStatus::Cancelled));
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Cancelled));
        assert!(!JobStatus::Cancelled.can_transition_to(JobStatus::Pending));
    }

    #[test]
    fn test_is_assigned_to() {
        let tech = Uuid::new_v4();
        let job = Job {
            id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            title: "Brake pads".to_string(),
            description: None,
            technicians: vec![tech],
            status: JobStatus::Pending,
            started_at: None,
            completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(job.is_assigned_to(tech));
        assert!(!job.is_assigned_to(Uuid::new_v4()));
    }
}
