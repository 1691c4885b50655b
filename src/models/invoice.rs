//! Invoice model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use uuid::Uuid;

use super::status::{display_as_str, Lifecycle};

/// Invoice status - maps to the `invoice_status` ENUM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
    Void,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Void => "void",
        }
    }
}

display_as_str!(InvoiceStatus);

impl Lifecycle for InvoiceStatus {
    fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (InvoiceStatus::Unpaid, InvoiceStatus::Paid) | (InvoiceStatus::Unpaid, InvoiceStatus::Void)
        )
    }
}

/// One billed line, stored inside the invoice as JSONB
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

/// Invoice row - maps to the invoices table
#[derive(Debug, Clone, FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub job_id: Uuid,
    pub customer_name: String,
    pub lines: Json<Vec<InvoiceLine>>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax_rate: Decimal,
    pub total: Decimal,
    pub status: InvoiceStatus,
    pub issued_by: Uuid,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_transitions() {
        assert!(InvoiceStatus::Unpaid.can_transition_to(InvoiceStatus::Paid));
        assert!(InvoiceStatus::Unpaid.can_transition_to(InvoiceStatus::Void));
        assert!(!InvoiceStatus::Paid.can_transition_to(InvoiceStatus::Void));
        assert!(!InvoiceStatus::Void.can_transition_to(InvoiceStatus::Paid));
        assert!(!InvoiceStatus::Paid.can_transition_to(InvoiceStatus::Unpaid));
    }
}
