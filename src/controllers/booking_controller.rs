use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::booking_dto::{
    draft_from_booking, BookingFilters, BookingResponse, CreateBookingRequest, StepValidation,
    UpdateBookingRequest,
};
use crate::dto::Pagination;
use crate::models::booking::BookingStatus;
use crate::models::Lifecycle;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::booking_wizard::{validate_all, validate_step, BookingDraft, BookingWizard, WizardStep};
use crate::services::time_slots::{self, SlotAvailability};
use crate::utils::errors::{bad_request_error, not_found_error, AppError};

pub struct BookingController {
    pool: PgPool,
    repository: BookingRepository,
    slot_capacity: i64,
}

impl BookingController {
    pub fn new(pool: PgPool, slot_capacity: i64) -> Self {
        Self {
            repository: BookingRepository::new(pool.clone()),
            pool,
            slot_capacity,
        }
    }

    pub async fn list(&self, filters: BookingFilters, page: Pagination) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = self.repository.list(&filters, page).await?;
        Ok(bookings.into_iter().map(BookingResponse::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<BookingResponse, AppError> {
        let booking = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        Ok(booking.into())
    }

    pub async fn slots(&self, date: NaiveDate, now: NaiveDateTime) -> Result<Vec<SlotAvailability>, AppError> {
        time_slots::check_booking_window(date, now.date())?;
        let booked = self.repository.slot_counts(date).await?;
        Ok(time_slots::availability(date, now, &booked, self.slot_capacity))
    }

    /// Check one wizard step, or every step in order when `step` is absent
    pub fn validate(&self, draft: &BookingDraft, step: Option<u8>, now: NaiveDateTime) -> Result<StepValidation, AppError> {
        match step {
            Some(number) => {
                let step = WizardStep::from_number(number)
                    .ok_or_else(|| bad_request_error("step must be between 1 and 5"))?;
                let errors = validate_step(draft, step, now);
                let valid = errors.is_empty();
                Ok(StepValidation {
                    step: Some(step),
                    valid,
                    errors,
                    next_step: if valid { step.next() } else { Some(step) },
                })
            }
            None => Ok(match validate_all(draft, now) {
                Ok(()) => StepValidation {
                    step: None,
                    valid: true,
                    errors: Default::default(),
                    next_step: Some(WizardStep::Review),
                },
                Err(failed) => StepValidation {
                    step: Some(failed.step),
                    valid: false,
                    next_step: Some(failed.step),
                    errors: failed.errors,
                },
            }),
        }
    }

    pub async fn create(
        &self,
        created_by: Uuid,
        draft: CreateBookingRequest,
        now: NaiveDateTime,
    ) -> Result<BookingResponse, AppError> {
        let valid = BookingWizard::from_draft(draft).submit(now)?;
        let label = valid.time_slot.label();

        let mut tx = self.pool.begin().await?;

        BookingRepository::lock_slot(&mut *tx, valid.booking_date, &label).await?;
        let booked = BookingRepository::count_in_slot(&mut *tx, valid.booking_date, &label, None).await?;
        time_slots::ensure_bookable(valid.booking_date, &label, now, booked, self.slot_capacity)?;

        let vehicle =
            VehicleRepository::upsert(&mut *tx, &valid.vehicle, &valid.customer_name, &valid.customer_phone).await?;
        let booking = BookingRepository::insert(&mut *tx, &valid, vehicle.id, created_by).await?;

        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            date = %booking.booking_date,
            slot = %booking.time_slot,
            "📅 booking created"
        );
        Ok(booking.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateBookingRequest,
        now: NaiveDateTime,
    ) -> Result<BookingResponse, AppError> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        if !current.status.is_editable() {
            return Err(AppError::Conflict(format!(
                "A booking that is {} can no longer be edited",
                current.status
            )));
        }

        let reschedules = request.reschedules();
        let mut draft = draft_from_booking(&current);
        request.merge_into(&mut draft);

        // an unchanged schedule is not re-judged against the clock
        let clock = if reschedules {
            now
        } else {
            current.booking_date.and_time(NaiveTime::MIN)
        };
        let valid = BookingWizard::from_draft(draft).submit(clock)?;
        let label = valid.time_slot.label();

        let mut tx = self.pool.begin().await?;

        if reschedules {
            BookingRepository::lock_slot(&mut *tx, valid.booking_date, &label).await?;
            let booked =
                BookingRepository::count_in_slot(&mut *tx, valid.booking_date, &label, Some(id)).await?;
            time_slots::ensure_bookable(valid.booking_date, &label, now, booked, self.slot_capacity)?;
        }

        let vehicle =
            VehicleRepository::upsert(&mut *tx, &valid.vehicle, &valid.customer_name, &valid.customer_phone).await?;
        let booking = BookingRepository::update_details(&mut *tx, id, &valid, vehicle.id)
            .await?
            .ok_or_else(|| AppError::Conflict("Booking changed status while being edited".to_string()))?;

        tx.commit().await?;

        Ok(booking.into())
    }

    pub async fn update_status(&self, id: Uuid, status: BookingStatus) -> Result<BookingResponse, AppError> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Booking", &id.to_string()))?;

        let next = current.status.transition(status)?;
        let booking = self
            .repository
            .update_status(id, current.status, next)
            .await?
            .ok_or_else(|| AppError::Conflict("Booking was modified concurrently, reload and retry".to_string()))?;

        info!(booking_id = %id, from = %current.status, to = %next, "booking status changed");
        Ok(booking.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = match self.repository.delete(id).await {
            Err(AppError::BadRequest(_)) => {
                return Err(AppError::Conflict(
                    "Booking has invoiced jobs and cannot be deleted; cancel it instead".to_string(),
                ))
            }
            other => other?,
        };

        if !deleted {
            return Err(not_found_error("Booking", &id.to_string()));
        }
        Ok(())
    }
}
