//! Inventory item model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Inventory item row - maps to the inventory_items table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub reorder_level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

/// Apply a signed stock movement, refusing to go below zero.
pub fn apply_stock_delta(current: i32, delta: i32) -> Result<i32, AppError> {
    let next = current
        .checked_add(delta)
        .ok_or_else(|| AppError::BadRequest("Stock adjustment out of range".to_string()))?;

    if next < 0 {
        return Err(AppError::Conflict(format!(
            "Insufficient stock: {} available, {} requested",
            current, -delta
        )));
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_never_negative() {
        assert_eq!(apply_stock_delta(10, -4).unwrap(), 6);
        assert_eq!(apply_stock_delta(4, -4).unwrap(), 0);
        assert_eq!(apply_stock_delta(0, 7).unwrap(), 7);
        assert!(matches!(apply_stock_delta(3, -4), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_stock_overflow_is_rejected() {
        assert!(matches!(apply_stock_delta(i32::MAX, 1), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_low_stock_threshold() {
        let mut item = InventoryItem {
            id: Uuid::new_v4(),
            name: "Oil filter".to_string(),
            sku: "OF-100".to_string(),
            category: "filters".to_string(),
            quantity: 5,
            unit_price: Decimal::new(1500, 2),
            reorder_level: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(item.is_low_stock());
        item.quantity = 6;
        assert!(!item.is_low_stock());
    }
}
