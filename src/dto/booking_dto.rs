use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus};
use crate::services::booking_wizard::{BookingDraft, FieldErrors, WizardStep};

/// POST /bookings takes the complete wizard draft
pub type CreateBookingRequest = BookingDraft;

/// PATCH /bookings/:id. Fields are merged onto the stored booking and the
/// result goes through the wizard again.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookingRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub vehicle_number: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_year: Option<i32>,
    pub service_type: Option<String>,
    pub booking_date: Option<String>,
    pub time_slot: Option<String>,
    pub notes: Option<String>,
}

impl UpdateBookingRequest {
    pub fn merge_into(self, draft: &mut BookingDraft) {
        if let Some(v) = self.customer_name {
            draft.customer_name = v;
        }
        if let Some(v) = self.customer_email {
            draft.customer_email = v;
        }
        if let Some(v) = self.customer_phone {
            draft.customer_phone = v;
        }
        if let Some(v) = self.vehicle_number {
            draft.vehicle_number = v;
        }
        if let Some(v) = self.vehicle_make {
            draft.vehicle_make = v;
        }
        if let Some(v) = self.vehicle_model {
            draft.vehicle_model = v;
        }
        if self.vehicle_year.is_some() {
            draft.vehicle_year = self.vehicle_year;
        }
        if let Some(v) = self.service_type {
            draft.service_type = v;
        }
        if let Some(v) = self.booking_date {
            draft.booking_date = v;
        }
        if let Some(v) = self.time_slot {
            draft.time_slot = v;
        }
        if self.notes.is_some() {
            draft.notes = self.notes;
        }
    }

    /// True when the request touches the date or the slot
    pub fn reschedules(&self) -> bool {
        self.booking_date.is_some() || self.time_slot.is_some()
    }
}

/// The stored booking as a wizard draft
pub fn draft_from_booking(booking: &Booking) -> BookingDraft {
    BookingDraft {
        customer_name: booking.customer_name.clone(),
        customer_email: booking.customer_email.clone(),
        customer_phone: booking.customer_phone.clone(),
        vehicle_number: booking.vehicle_number.clone(),
        vehicle_make: booking.vehicle_make.clone(),
        vehicle_model: booking.vehicle_model.clone(),
        vehicle_year: Some(booking.vehicle_year),
        service_type: booking.service_type.clone(),
        booking_date: booking.booking_date.format("%Y-%m-%d").to_string(),
        time_slot: booking.time_slot.clone(),
        notes: booking.notes.clone(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BookingFilters {
    pub status: Option<BookingStatus>,
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Matches customer name, email, phone or vehicle number
    pub search: Option<String>,
}

/// GET /bookings/slots?date=
#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub date: Option<NaiveDate>,
}

/// POST /bookings/validate?step=
#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub step: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct StepValidation {
    pub step: Option<WizardStep>,
    pub valid: bool,
    pub errors: FieldErrors,
    /// Step the client should show next
    pub next_step: Option<WizardStep>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleSummary {
    pub id: Uuid,
    pub vehicle_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub vehicle: VehicleSummary,
    pub service_type: String,
    pub booking_date: NaiveDate,
    pub time_slot: String,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            customer_name: b.customer_name,
            customer_email: b.customer_email,
            customer_phone: b.customer_phone,
            vehicle: VehicleSummary {
                id: b.vehicle_id,
                vehicle_number: b.vehicle_number,
                make: b.vehicle_make,
                model: b.vehicle_model,
                year: b.vehicle_year,
            },
            service_type: b.service_type,
            booking_date: b.booking_date,
            time_slot: b.time_slot,
            notes: b.notes,
            status: b.status,
            created_by: b.created_by,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}
