use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::dto::booking_dto::BookingFilters;
use crate::dto::Pagination;
use crate::models::booking::{Booking, BookingStatus};
use crate::services::booking_wizard::ValidBooking;
use crate::utils::errors::AppError;

const BOOKING_COLUMNS: &str = "b.*, v.vehicle_number, v.make AS vehicle_make, \
     v.model AS vehicle_model, v.year AS vehicle_year";

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let sql = format!(
            "SELECT {} FROM bookings b JOIN vehicles v ON v.id = b.vehicle_id WHERE b.id = $1",
            BOOKING_COLUMNS
        );
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn list(&self, filters: &BookingFilters, page: Pagination) -> Result<Vec<Booking>, AppError> {
        let sql = format!(
            r#"
            SELECT {} FROM bookings b JOIN vehicles v ON v.id = b.vehicle_id
            WHERE ($1::booking_status IS NULL OR b.status = $1)
              AND ($2::date IS NULL OR b.booking_date = $2)
              AND ($3::date IS NULL OR b.booking_date >= $3)
              AND ($4::date IS NULL OR b.booking_date <= $4)
              AND ($5::text IS NULL
                   OR b.customer_name ILIKE $5
                   OR b.customer_email ILIKE $5
                   OR b.customer_phone ILIKE $5
                   OR v.vehicle_number ILIKE $5)
            ORDER BY b.booking_date DESC, b.time_slot ASC
            LIMIT $6 OFFSET $7
            "#,
            BOOKING_COLUMNS
        );
        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .bind(filters.status)
            .bind(filters.date)
            .bind(filters.from)
            .bind(filters.to)
            .bind(filters.search.as_deref().map(|s| format!("%{}%", s.trim())))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }

    /// Live bookings per slot label on `date`
    pub async fn slot_counts(&self, date: NaiveDate) -> Result<HashMap<String, i64>, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT time_slot, COUNT(*) FROM bookings
            WHERE booking_date = $1 AND status <> 'cancelled'
            GROUP BY time_slot
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Serialize writers on one (date, slot) until the transaction ends
    pub async fn lock_slot<'e, E: PgExecutor<'e>>(
        executor: E,
        date: NaiveDate,
        time_slot: &str,
    ) -> Result<(), AppError> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(format!("booking-slot:{}:{}", date, time_slot))
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Live bookings in one slot, optionally ignoring the booking being edited
    pub async fn count_in_slot<'e, E: PgExecutor<'e>>(
        executor: E,
        date: NaiveDate,
        time_slot: &str,
        exclude: Option<Uuid>,
    ) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE booking_date = $1 AND time_slot = $2 AND status <> 'cancelled'
              AND ($3::uuid IS NULL OR id <> $3)
            "#,
        )
        .bind(date)
        .bind(time_slot)
        .bind(exclude)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        booking: &ValidBooking,
        vehicle_id: Uuid,
        created_by: Uuid,
    ) -> Result<Booking, AppError> {
        let sql = format!(
            r#"
            WITH b AS (
                INSERT INTO bookings (id, customer_name, customer_email, customer_phone, vehicle_id,
                                      service_type, booking_date, time_slot, notes, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            SELECT {} FROM b JOIN vehicles v ON v.id = b.vehicle_id
            "#,
            BOOKING_COLUMNS
        );
        let created = sqlx::query_as::<_, Booking>(&sql)
            .bind(Uuid::new_v4())
            .bind(&booking.customer_name)
            .bind(&booking.customer_email)
            .bind(&booking.customer_phone)
            .bind(vehicle_id)
            .bind(&booking.service_type)
            .bind(booking.booking_date)
            .bind(booking.time_slot.label())
            .bind(&booking.notes)
            .bind(created_by)
            .fetch_one(executor)
            .await?;

        Ok(created)
    }

    pub async fn update_details<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
        booking: &ValidBooking,
        vehicle_id: Uuid,
    ) -> Result<Option<Booking>, AppError> {
        let sql = format!(
            r#"
            WITH b AS (
                UPDATE bookings
                SET customer_name = $2, customer_email = $3, customer_phone = $4, vehicle_id = $5,
                    service_type = $6, booking_date = $7, time_slot = $8, notes = $9,
                    updated_at = NOW()
                WHERE id = $1 AND status IN ('pending', 'confirmed')
                RETURNING *
            )
            SELECT {} FROM b JOIN vehicles v ON v.id = b.vehicle_id
            "#,
            BOOKING_COLUMNS
        );
        let updated = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .bind(&booking.customer_name)
            .bind(&booking.customer_email)
            .bind(&booking.customer_phone)
            .bind(vehicle_id)
            .bind(&booking.service_type)
            .bind(booking.booking_date)
            .bind(booking.time_slot.label())
            .bind(&booking.notes)
            .fetch_optional(executor)
            .await?;

        Ok(updated)
    }

    /// Compare-and-set on the status column. `None` means the row is gone
    /// or no longer in `from`.
    pub async fn update_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>, AppError> {
        let sql = format!(
            r#"
            WITH b AS (
                UPDATE bookings SET status = $3, updated_at = NOW()
                WHERE id = $1 AND status = $2
                RETURNING *
            )
            SELECT {} FROM b JOIN vehicles v ON v.id = b.vehicle_id
            "#,
            BOOKING_COLUMNS
        );
        let updated = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
