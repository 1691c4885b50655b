use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::invoice_dto::{CreateInvoiceRequest, InvoiceFilters, InvoiceResponse};
use crate::dto::Pagination;
use crate::models::invoice::InvoiceStatus;
use crate::models::job::JobStatus;
use crate::models::Lifecycle;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::invoice_repository::{InvoiceRepository, NewInvoice};
use crate::repositories::job_repository::JobRepository;
use crate::services::invoice_calculator::{compute_totals, invoice_number, price_lines};
use crate::utils::errors::{not_found_error, AppError};

pub struct InvoiceController {
    repository: InvoiceRepository,
    jobs: JobRepository,
    bookings: BookingRepository,
}

impl InvoiceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InvoiceRepository::new(pool.clone()),
            jobs: JobRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool),
        }
    }

    pub async fn list(&self, filters: InvoiceFilters, page: Pagination) -> Result<Vec<InvoiceResponse>, AppError> {
        let invoices = self.repository.list(&filters, page).await?;
        Ok(invoices.into_iter().map(InvoiceResponse::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<InvoiceResponse, AppError> {
        let invoice = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Invoice", &id.to_string()))?;

        Ok(invoice.into())
    }

    pub async fn create(&self, issued_by: Uuid, request: CreateInvoiceRequest) -> Result<InvoiceResponse, AppError> {
        request.validate()?;

        let job = self
            .jobs
            .find_by_id(request.job_id)
            .await?
            .ok_or_else(|| not_found_error("Job", &request.job_id.to_string()))?;

        if job.status == JobStatus::Cancelled {
            return Err(AppError::Conflict("Cannot invoice a cancelled job".to_string()));
        }

        let booking = self
            .bookings
            .find_by_id(job.booking_id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &job.booking_id.to_string()))?;

        let lines = price_lines(request.lines.into_iter().map(Into::into).collect())?;
        let totals = compute_totals(&lines, request.discount, request.tax_rate)?;

        let id = Uuid::new_v4();
        let invoice = self
            .repository
            .create(NewInvoice {
                id,
                invoice_number: invoice_number(Utc::now().date_naive(), id),
                job_id: job.id,
                customer_name: booking.customer_name,
                lines,
                totals,
                tax_rate: request.tax_rate,
                issued_by,
            })
            .await?;

        info!(invoice = %invoice.invoice_number, total = %invoice.total, "🧾 invoice issued");
        Ok(invoice.into())
    }

    pub async fn update_status(&self, id: Uuid, status: InvoiceStatus) -> Result<InvoiceResponse, AppError> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Invoice", &id.to_string()))?;

        let next = current.status.transition(status)?;
        let invoice = self
            .repository
            .update_status(id, current.status, next)
            .await?
            .ok_or_else(|| AppError::Conflict("Invoice was modified concurrently, reload and retry".to_string()))?;

        info!(invoice = %invoice.invoice_number, from = %current.status, to = %next, "invoice status changed");
        Ok(invoice.into())
    }

    /// Paid invoices are kept as records
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let invoice = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Invoice", &id.to_string()))?;

        if invoice.status == InvoiceStatus::Paid {
            return Err(AppError::Conflict("Paid invoices cannot be deleted; void them instead".to_string()));
        }

        self.repository.delete(id).await?;
        Ok(())
    }
}
