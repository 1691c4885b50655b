//! Goods request model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use super::status::{display_as_str, Lifecycle};

/// Goods request status - maps to the `goods_request_status` ENUM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "goods_request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GoodsRequestStatus {
    Pending,
    Approved,
    Rejected,
    Released,
}

impl GoodsRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoodsRequestStatus::Pending => "pending",
            GoodsRequestStatus::Approved => "approved",
            GoodsRequestStatus::Rejected => "rejected",
            GoodsRequestStatus::Released => "released",
        }
    }
}

display_as_str!(GoodsRequestStatus);

impl Lifecycle for GoodsRequestStatus {
    fn can_transition_to(&self, next: Self) -> bool {
        use GoodsRequestStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Released)
        )
    }
}

/// Goods request row - maps to the goods_requests table
#[derive(Debug, Clone, FromRow)]
pub struct GoodsRequest {
    pub id: Uuid,
    pub job_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub requested_by: Uuid,
    pub status: GoodsRequestStatus,
    pub reviewed_by: Option<Uuid>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
