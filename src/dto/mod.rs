//! Request and response DTOs
//!
//! Responses are wrapped in an entity envelope by the route handlers
//! (`{ "booking": {...} }`, `{ "bookings": [...] }`).

pub mod auth_dto;
pub mod booking_dto;
pub mod goods_request_dto;
pub mod inventory_dto;
pub mod invoice_dto;
pub mod job_dto;
pub mod leave_dto;
pub mod user_dto;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

/// `?limit=&offset=` shared by every list endpoint
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Body of every status endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct StatusRequest<S> {
    pub status: S,
    #[serde(default)]
    pub note: Option<String>,
}

/// `{ "message": "..." }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::default();
        assert_eq!(p.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(p.offset(), 0);

        let p = Pagination { limit: Some(10_000), offset: Some(-5) };
        assert_eq!(p.limit(), MAX_PAGE_SIZE);
        assert_eq!(p.offset(), 0);

        let p = Pagination { limit: Some(0), offset: Some(20) };
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 20);
    }
}
