use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::inventory::InventoryItem;
use crate::utils::validation::{validate_money, SKU_RE};

/// POST /inventory
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,
    #[validate(regex(path = "SKU_RE", message = "SKU must be 3-32 upper-case letters, digits or dashes"))]
    pub sku: String,
    #[validate(length(min = 2, max = 50, message = "Category must be 2-50 characters"))]
    pub category: String,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    #[serde(default)]
    pub quantity: i32,
    #[validate(custom = "validate_money")]
    pub unit_price: Decimal,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    #[serde(default)]
    pub reorder_level: i32,
}

/// PATCH /inventory/:id. Stock moves go through the stock endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: Option<String>,
    #[validate(regex(path = "SKU_RE", message = "SKU must be 3-32 upper-case letters, digits or dashes"))]
    pub sku: Option<String>,
    #[validate(length(min = 2, max = 50, message = "Category must be 2-50 characters"))]
    pub category: Option<String>,
    #[validate(custom = "validate_money")]
    pub unit_price: Option<Decimal>,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: Option<i32>,
}

/// PATCH /inventory/:id/stock
#[derive(Debug, Deserialize)]
pub struct StockAdjustmentRequest {
    pub delta: i32,
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InventoryFilters {
    /// Matches name or SKU
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InventoryItemResponse {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub reorder_level: i32,
    pub low_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InventoryItem> for InventoryItemResponse {
    fn from(item: InventoryItem) -> Self {
        Self {
            low_stock: item.is_low_stock(),
            id: item.id,
            name: item.name,
            sku: item.sku,
            category: item.category,
            quantity: item.quantity,
            unit_price: item.unit_price,
            reorder_level: item.reorder_level,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}
