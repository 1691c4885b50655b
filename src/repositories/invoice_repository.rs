use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::invoice_dto::InvoiceFilters;
use crate::dto::Pagination;
use crate::models::invoice::{Invoice, InvoiceLine, InvoiceStatus};
use crate::services::invoice_calculator::InvoiceTotals;
use crate::utils::errors::AppError;

/// Everything needed to write a new invoice row
#[derive(Debug)]
pub struct NewInvoice {
    pub id: Uuid,
    pub invoice_number: String,
    pub job_id: Uuid,
    pub customer_name: String,
    pub lines: Vec<InvoiceLine>,
    pub totals: InvoiceTotals,
    pub tax_rate: Decimal,
    pub issued_by: Uuid,
}

pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, invoice: NewInvoice) -> Result<Invoice, AppError> {
        let created = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (id, invoice_number, job_id, customer_name, lines,
                                  subtotal, discount, tax_rate, total, issued_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(invoice.id)
        .bind(&invoice.invoice_number)
        .bind(invoice.job_id)
        .bind(&invoice.customer_name)
        .bind(Json(&invoice.lines))
        .bind(invoice.totals.subtotal)
        .bind(invoice.totals.discount)
        .bind(invoice.tax_rate)
        .bind(invoice.totals.total)
        .bind(invoice.issued_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(invoice)
    }

    pub async fn list(&self, filters: &InvoiceFilters, page: Pagination) -> Result<Vec<Invoice>, AppError> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT * FROM invoices
            WHERE ($1::invoice_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR job_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filters.status)
        .bind(filters.job_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Compare-and-set on status; stamps `paid_at` when moving to paid
    pub async fn update_status(
        &self,
        id: Uuid,
        from: InvoiceStatus,
        to: InvoiceStatus,
    ) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET status = $3,
                paid_at = CASE WHEN $3 = 'paid'::invoice_status THEN NOW() ELSE paid_at END,
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
