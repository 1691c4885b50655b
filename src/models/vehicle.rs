//! Vehicle model
//!
//! Customer vehicles are keyed by their registration number and upserted
//! whenever a booking names them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub vehicle_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub owner_name: String,
    pub owner_phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
