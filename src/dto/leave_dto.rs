use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::utils::errors::AppError;

/// Longest single leave request, inclusive of both ends
pub const MAX_LEAVE_DAYS: i64 = 30;

/// POST /leave-requests
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLeaveRequest {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 3, max = 500, message = "Reason must be 3-500 characters"))]
    pub reason: String,
}

impl CreateLeaveRequest {
    /// Date rules relative to `today`
    pub fn check_dates(&self, today: NaiveDate) -> Result<(), AppError> {
        if self.start_date < today {
            return Err(AppError::BadRequest("Leave cannot start in the past".to_string()));
        }
        if self.end_date < self.start_date {
            return Err(AppError::BadRequest("End date cannot be before start date".to_string()));
        }
        if self.end_date - self.start_date >= Duration::days(MAX_LEAVE_DAYS) {
            return Err(AppError::BadRequest(format!(
                "A leave request cannot exceed {} days",
                MAX_LEAVE_DAYS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaveFilters {
    pub status: Option<LeaveStatus>,
    /// Supervisors only; other roles always see their own
    pub employee_id: Option<Uuid>,
}

impl LeaveFilters {
    /// Employee scope for a listing: other roles are pinned to themselves
    pub fn scope(&self, caller: Uuid, supervisor: bool) -> Option<Uuid> {
        if supervisor {
            self.employee_id
        } else {
            Some(caller)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveResponse {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub reason: String,
    pub status: LeaveStatus,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LeaveRequest> for LeaveResponse {
    fn from(leave: LeaveRequest) -> Self {
        Self {
            days: leave.days(),
            id: leave.id,
            employee_id: leave.employee_id,
            leave_type: leave.leave_type,
            start_date: leave.start_date,
            end_date: leave.end_date,
            reason: leave.reason,
            status: leave.status,
            reviewed_by: leave.reviewed_by,
            created_at: leave.created_at,
            updated_at: leave.updated_at,
        }
    }
}
