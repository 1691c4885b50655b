//! Booking intake wizard
//!
//! Bookings are captured in five linear steps. Each step owns a group of
//! fields and must be clean before the wizard moves on; `submit` re-checks
//! every step in order so a draft assembled out of band cannot skip one.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::services::time_slots::{self, TimeSlot};
use crate::utils::errors::AppError;
use crate::utils::validation::{
    validate_date, validate_vehicle_year, NAME_RE, PHONE_RE, VEHICLE_NUMBER_RE,
};

/// Services the workshop offers at intake
pub const SERVICE_TYPES: [&str; 8] = [
    "full_service",
    "oil_change",
    "brake_service",
    "engine_repair",
    "wheel_alignment",
    "body_wash",
    "diagnostics",
    "other",
];

const MAX_NOTES_LENGTH: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Customer,
    Vehicle,
    Service,
    Schedule,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Customer,
        WizardStep::Vehicle,
        WizardStep::Service,
        WizardStep::Schedule,
        WizardStep::Review,
    ];

    /// 1-based position shown to the user
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Customer => 1,
            WizardStep::Vehicle => 2,
            WizardStep::Service => 3,
            WizardStep::Schedule => 4,
            WizardStep::Review => 5,
        }
    }

    pub fn from_number(n: u8) -> Option<WizardStep> {
        WizardStep::ALL.iter().copied().find(|s| s.number() == n)
    }

    pub fn next(&self) -> Option<WizardStep> {
        WizardStep::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<WizardStep> {
        self.number().checked_sub(1).and_then(WizardStep::from_number)
    }
}

/// Partially filled booking form. Every field is optional on the wire so a
/// client can validate step by step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingDraft {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub vehicle_number: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub vehicle_year: Option<i32>,
    pub service_type: String,
    pub booking_date: String,
    pub time_slot: String,
    pub notes: Option<String>,
}

/// Field name to message
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StepErrors {
    pub step: WizardStep,
    pub errors: FieldErrors,
}

impl From<StepErrors> for AppError {
    fn from(step_errors: StepErrors) -> Self {
        let mut errors = validator::ValidationErrors::new();
        for (field, message) in step_errors.errors {
            let mut error = validator::ValidationError::new("invalid");
            error.message = Some(message.into());
            error.add_param("step".into(), &step_errors.step);
            errors.add(field, error);
        }
        AppError::Validation(errors)
    }
}

/// Vehicle details once the vehicle step is clean
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleDetails {
    pub number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
}

/// A draft that passed every step
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBooking {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub vehicle: VehicleDetails,
    pub service_type: String,
    pub booking_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub notes: Option<String>,
}

/// Field checks for one step. `now` is the shop's local wall-clock time.
pub fn validate_step(draft: &BookingDraft, step: WizardStep, now: NaiveDateTime) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match step {
        WizardStep::Customer => {
            if !NAME_RE.is_match(draft.customer_name.trim()) {
                errors.insert("customer_name", "Name must be 2-50 letters".to_string());
            }
            if !validator::validate_email(draft.customer_email.trim()) {
                errors.insert("customer_email", "Enter a valid email address".to_string());
            }
            if !PHONE_RE.is_match(draft.customer_phone.trim()) {
                errors.insert("customer_phone", "Phone number must be 10 digits starting with 0".to_string());
            }
        }
        WizardStep::Vehicle => {
            if !VEHICLE_NUMBER_RE.is_match(draft.vehicle_number.trim()) {
                errors.insert("vehicle_number", "Vehicle number must look like ABC-1234".to_string());
            }
            if draft.vehicle_make.trim().is_empty() {
                errors.insert("vehicle_make", "Vehicle make is required".to_string());
            }
            if draft.vehicle_model.trim().is_empty() {
                errors.insert("vehicle_model", "Vehicle model is required".to_string());
            }
            match draft.vehicle_year {
                None => {
                    errors.insert("vehicle_year", "Vehicle year is required".to_string());
                }
                Some(year) if validate_vehicle_year(year).is_err() => {
                    errors.insert("vehicle_year", "Vehicle year is out of range".to_string());
                }
                Some(_) => {}
            }
        }
        WizardStep::Service => {
            if !SERVICE_TYPES.contains(&draft.service_type.as_str()) {
                errors.insert("service_type", "Select a service type".to_string());
            }
            if draft.notes.as_ref().map_or(false, |n| n.chars().count() > MAX_NOTES_LENGTH) {
                errors.insert("notes", format!("Notes cannot exceed {} characters", MAX_NOTES_LENGTH));
            }
        }
        WizardStep::Schedule => match validate_date(draft.booking_date.trim()) {
            Err(_) => {
                errors.insert("booking_date", "Select a date".to_string());
            }
            Ok(date) => {
                if let Err(e) = time_slots::check_booking_window(date, now.date()) {
                    errors.insert("booking_date", message_of(e));
                }
                match TimeSlot::parse(draft.time_slot.trim()) {
                    None => {
                        errors.insert("time_slot", "Select a time slot".to_string());
                    }
                    Some(slot) if slot.has_passed(date, now) => {
                        errors.insert("time_slot", "This time slot has already passed".to_string());
                    }
                    Some(_) => {}
                }
            }
        },
        WizardStep::Review => {}
    }

    errors
}

/// Validate the steps in order and stop at the first one with errors
pub fn validate_all(draft: &BookingDraft, now: NaiveDateTime) -> Result<(), StepErrors> {
    for step in WizardStep::ALL {
        let errors = validate_step(draft, step, now);
        if !errors.is_empty() {
            return Err(StepErrors { step, errors });
        }
    }
    Ok(())
}

fn message_of(error: AppError) -> String {
    match error {
        AppError::BadRequest(msg) | AppError::Conflict(msg) => msg,
        other => other.to_string(),
    }
}

/// Step cursor over a draft
#[derive(Debug, Clone)]
pub struct BookingWizard {
    step: WizardStep,
    draft: BookingDraft,
}

impl BookingWizard {
    pub fn new() -> Self {
        Self::from_draft(BookingDraft::default())
    }

    pub fn from_draft(draft: BookingDraft) -> Self {
        Self {
            step: WizardStep::Customer,
            draft,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut BookingDraft {
        &mut self.draft
    }

    /// Move to the next step if the current one is clean. Review is the end.
    pub fn advance(&mut self, now: NaiveDateTime) -> Result<WizardStep, StepErrors> {
        let errors = validate_step(&self.draft, self.step, now);
        if !errors.is_empty() {
            return Err(StepErrors { step: self.step, errors });
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Validate the whole draft and hand back typed, trimmed values.
    pub fn submit(self, now: NaiveDateTime) -> Result<ValidBooking, StepErrors> {
        validate_all(&self.draft, now)?;

        let draft = self.draft;
        let (booking_date, time_slot, vehicle_year) = match (
            validate_date(draft.booking_date.trim()).ok(),
            TimeSlot::parse(draft.time_slot.trim()),
            draft.vehicle_year,
        ) {
            (Some(date), Some(slot), Some(year)) => (date, slot, year),
            // unreachable once validate_all passed, kept total for the type checker
            _ => {
                let mut errors = FieldErrors::new();
                errors.insert("booking_date", "Incomplete schedule".to_string());
                return Err(StepErrors { step: WizardStep::Schedule, errors });
            }
        };

        Ok(ValidBooking {
            customer_name: draft.customer_name.trim().to_string(),
            customer_email: draft.customer_email.trim().to_lowercase(),
            customer_phone: draft.customer_phone.trim().to_string(),
            vehicle: VehicleDetails {
                number: draft.vehicle_number.trim().to_string(),
                make: draft.vehicle_make.trim().to_string(),
                model: draft.vehicle_model.trim().to_string(),
                year: vehicle_year,
            },
            service_type: draft.service_type,
            booking_date,
            time_slot,
            notes: draft.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        })
    }
}

impl Default for BookingWizard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn complete_draft() -> BookingDraft {
        BookingDraft {
            customer_name: "Nimal Silva".to_string(),
            customer_email: "Nimal@Example.com".to_string(),
            customer_phone: "0771234567".to_string(),
            vehicle_number: "CAB-1234".to_string(),
            vehicle_make: "Toyota".to_string(),
            vehicle_model: "Axio".to_string(),
            vehicle_year: Some(2016),
            service_type: "oil_change".to_string(),
            booking_date: "2024-06-04".to_string(),
            time_slot: "09:00-10:00".to_string(),
            notes: Some("  Check the brakes too ".to_string()),
        }
    }

    #[test]
    fn test_step_numbering() {
        assert_eq!(WizardStep::Customer.number(), 1);
        assert_eq!(WizardStep::from_number(5), Some(WizardStep::Review));
        assert_eq!(WizardStep::from_number(6), None);
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::Customer.previous(), None);
        assert_eq!(WizardStep::Schedule.previous(), Some(WizardStep::Service));
    }

    #[test]
    fn test_advance_blocked_by_invalid_fields() {
        let mut wizard = BookingWizard::new();
        wizard.draft_mut().customer_name = "Nimal Silva".to_string();
        wizard.draft_mut().customer_email = "not-an-email".to_string();
        wizard.draft_mut().customer_phone = "12345".to_string();

        let err = wizard.advance(now()).unwrap_err();
        assert_eq!(err.step, WizardStep::Customer);
        assert!(err.errors.contains_key("customer_email"));
        assert!(err.errors.contains_key("customer_phone"));
        assert!(!err.errors.contains_key("customer_name"));
        assert_eq!(wizard.step(), WizardStep::Customer);
    }

    #[test]
    fn test_walks_all_five_steps() {
        let mut wizard = BookingWizard::from_draft(complete_draft());
        assert_eq!(wizard.advance(now()).unwrap(), WizardStep::Vehicle);
        assert_eq!(wizard.advance(now()).unwrap(), WizardStep::Service);
        assert_eq!(wizard.advance(now()).unwrap(), WizardStep::Schedule);
        assert_eq!(wizard.advance(now()).unwrap(), WizardStep::Review);
        // review is terminal
        assert_eq!(wizard.advance(now()).unwrap(), WizardStep::Review);
        assert_eq!(wizard.back(), WizardStep::Schedule);
    }

    #[test]
    fn test_back_never_fails() {
        let mut wizard = BookingWizard::new();
        assert_eq!(wizard.back(), WizardStep::Customer);
    }

    #[test]
    fn test_vehicle_step_rules() {
        let mut draft = complete_draft();
        draft.vehicle_number = "cab1234".to_string();
        draft.vehicle_year = Some(1901);
        draft.vehicle_make = " ".to_string();
        let errors = validate_step(&draft, WizardStep::Vehicle, now());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_schedule_rejects_passed_slot_today_only() {
        let mut draft = complete_draft();
        draft.booking_date = "2024-06-03".to_string();
        draft.time_slot = "09:00-10:00".to_string();
        let errors = validate_step(&draft, WizardStep::Schedule, now());
        assert!(errors.contains_key("time_slot"));

        draft.booking_date = "2024-06-04".to_string();
        assert!(validate_step(&draft, WizardStep::Schedule, now()).is_empty());
    }

    #[test]
    fn test_schedule_rejects_dates_outside_window() {
        let mut draft = complete_draft();
        let too_far = now().date() + Duration::days(31);
        draft.booking_date = too_far.format("%Y-%m-%d").to_string();
        let errors = validate_step(&draft, WizardStep::Schedule, now());
        assert!(errors.contains_key("booking_date"));
    }

    #[test]
    fn test_submit_reports_first_failing_step() {
        let mut draft = complete_draft();
        draft.service_type = "teleport".to_string();
        draft.time_slot = "bogus".to_string();
        let err = BookingWizard::from_draft(draft).submit(now()).unwrap_err();
        assert_eq!(err.step, WizardStep::Service);
    }

    #[test]
    fn test_submit_normalises_values() {
        let booking = BookingWizard::from_draft(complete_draft()).submit(now()).unwrap();
        assert_eq!(booking.customer_email, "nimal@example.com");
        assert_eq!(booking.notes.as_deref(), Some("Check the brakes too"));
        assert_eq!(booking.time_slot.label(), "09:00-10:00");
        assert_eq!(booking.vehicle.year, 2016);
    }

    #[test]
    fn test_step_errors_become_validation_error() {
        let err = BookingWizard::new().submit(now()).unwrap_err();
        match AppError::from(err) {
            AppError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("customer_name"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
