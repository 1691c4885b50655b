use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::invoice::{Invoice, InvoiceLine, InvoiceStatus};
use crate::services::invoice_calculator::{round_money, LineInput};
use crate::utils::validation::{validate_money, validate_tax_rate};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoiceLineRequest {
    #[validate(length(min = 1, max = 200, message = "Description is required"))]
    pub description: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom = "validate_money")]
    pub unit_price: Decimal,
}

impl From<InvoiceLineRequest> for LineInput {
    fn from(line: InvoiceLineRequest) -> Self {
        LineInput {
            description: line.description,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

/// POST /invoices
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    pub job_id: Uuid,
    #[validate]
    pub lines: Vec<InvoiceLineRequest>,
    #[serde(default)]
    #[validate(custom = "validate_money")]
    pub discount: Decimal,
    #[serde(default)]
    #[validate(custom = "validate_tax_rate")]
    pub tax_rate: Decimal,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceFilters {
    pub status: Option<InvoiceStatus>,
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub invoice_number: String,
    pub job_id: Uuid,
    pub customer_name: String,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub status: InvoiceStatus,
    pub issued_by: Uuid,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        let tax = round_money(invoice.total - (invoice.subtotal - invoice.discount));
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            job_id: invoice.job_id,
            customer_name: invoice.customer_name,
            lines: invoice.lines.0,
            subtotal: invoice.subtotal,
            discount: invoice.discount,
            tax_rate: invoice.tax_rate,
            tax,
            total: invoice.total,
            status: invoice.status,
            issued_by: invoice.issued_by,
            paid_at: invoice.paid_at,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_request_defaults_and_nested_validation() {
        let body = serde_json::json!({
            "job_id": Uuid::new_v4(),
            "lines": [{ "description": "Labour", "quantity": 2, "unit_price": "2500.00" }],
        });
        let request: CreateInvoiceRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.discount, Decimal::ZERO);
        assert_eq!(request.tax_rate, Decimal::ZERO);
        assert!(request.validate().is_ok());

        let body = serde_json::json!({
            "job_id": Uuid::new_v4(),
            "lines": [{ "description": "", "quantity": 0, "unit_price": "10" }],
        });
        let request: CreateInvoiceRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_invoice_request_rejects_out_of_range_money() {
        let body = serde_json::json!({
            "job_id": Uuid::new_v4(),
            "lines": [{ "description": "Labour", "quantity": 2, "unit_price": "79228162514264337593543950335" }],
        });
        let request: CreateInvoiceRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());

        let body = serde_json::json!({
            "job_id": Uuid::new_v4(),
            "lines": [{ "description": "Labour", "quantity": 1, "unit_price": "10.005" }],
        });
        let request: CreateInvoiceRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_err());

        let body = serde_json::json!({
            "job_id": Uuid::new_v4(),
            "lines": [{ "description": "Labour", "quantity": 1, "unit_price": "100" }],
            "discount": "0.001",
            "tax_rate": "0.08125",
        });
        let request: CreateInvoiceRequest = serde_json::from_value(body).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("discount"));
        assert!(fields.contains_key("tax_rate"));
    }
}
