use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::goods_request::{GoodsRequest, GoodsRequestStatus};

/// POST /goods-requests
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGoodsRequest {
    pub job_id: Uuid,
    pub item_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoodsRequestFilters {
    pub status: Option<GoodsRequestStatus>,
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoodsRequestResponse {
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

impl From<GoodsRequest> for GoodsRequestResponse {
    fn from(r: GoodsRequest) -> Self {
        Self {
            id: r.id,
            job_id: r.job_id,
            item_id: r.item_id,
            quantity: r.quantity,
            requested_by: r.requested_by,
            status: r.status,
            reviewed_by: r.reviewed_by,
            note: r.note,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_must_be_positive() {
        let request = CreateGoodsRequest {
            job_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            quantity: 0,
            note: None,
        };
        assert!(request.validate().is_err());
    }
}
