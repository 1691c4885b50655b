//! Booking time slots
//!
//! The workshop takes bookings in fixed hourly slots. A slot on today's date
//! stops being bookable once its end time has passed; other dates inside the
//! booking window are judged on capacity alone.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::utils::errors::AppError;

/// Bookings are accepted from today up to this many days ahead.
pub const BOOKING_WINDOW_DAYS: i64 = 30;

const FIRST_SLOT_HOUR: u32 = 8;
const LAST_SLOT_END_HOUR: u32 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    /// Label used on the wire and in the database, e.g. `08:00-09:00`
    pub fn label(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }

    /// Parse a label back into one of the workshop's daily slots
    pub fn parse(label: &str) -> Option<TimeSlot> {
        daily_slots().into_iter().find(|slot| slot.label() == label)
    }

    /// A slot is over once the clock reaches its end, and only on that day.
    pub fn has_passed(&self, date: NaiveDate, now: NaiveDateTime) -> bool {
        date == now.date() && now.time() >= self.end
    }
}

/// Wall-clock time at the shop. Slots are local times.
pub fn shop_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// The fixed set of hourly slots, 08:00 to 17:00
pub fn daily_slots() -> Vec<TimeSlot> {
    (FIRST_SLOT_HOUR..LAST_SLOT_END_HOUR)
        .filter_map(|hour| {
            let start = NaiveTime::from_hms_opt(hour, 0, 0)?;
            let end = NaiveTime::from_hms_opt(hour + 1, 0, 0)?;
            Some(TimeSlot { start, end })
        })
        .collect()
}

/// Reject dates before today or beyond the booking window
pub fn check_booking_window(date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if date < today {
        return Err(AppError::BadRequest("Booking date cannot be in the past".to_string()));
    }
    if date > today + Duration::days(BOOKING_WINDOW_DAYS) {
        return Err(AppError::BadRequest(format!(
            "Bookings can only be made up to {} days ahead",
            BOOKING_WINDOW_DAYS
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SlotAvailability {
    pub label: String,
    pub start: String,
    pub end: String,
    pub booked: i64,
    pub capacity: i64,
    pub passed: bool,
    pub available: bool,
}

/// Availability of every slot on `date`, given how many live bookings each
/// slot label already holds.
pub fn availability(
    date: NaiveDate,
    now: NaiveDateTime,
    booked: &HashMap<String, i64>,
    capacity: i64,
) -> Vec<SlotAvailability> {
    daily_slots()
        .into_iter()
        .map(|slot| {
            let label = slot.label();
            let count = booked.get(&label).copied().unwrap_or(0);
            let passed = slot.has_passed(date, now);
            SlotAvailability {
                start: slot.start.format("%H:%M").to_string(),
                end: slot.end.format("%H:%M").to_string(),
                booked: count,
                capacity,
                passed,
                available: !passed && count < capacity,
                label,
            }
        })
        .collect()
}

/// Final gate before a booking is written: the date must be in window, the
/// slot must exist, must not have passed, and must have a free bay.
pub fn ensure_bookable(
    date: NaiveDate,
    label: &str,
    now: NaiveDateTime,
    booked_in_slot: i64,
    capacity: i64,
) -> Result<TimeSlot, AppError> {
    check_booking_window(date, now.date())?;

    let slot = TimeSlot::parse(label)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown time slot '{}'", label)))?;

    if slot.has_passed(date, now) {
        return Err(AppError::BadRequest(format!("Time slot {} has already passed", label)));
    }
    if booked_in_slot >= capacity {
        return Err(AppError::Conflict(format!("Time slot {} is fully booked", label)));
    }
    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daily_slots_cover_working_hours() {
        let slots = daily_slots();
        assert_eq!(slots.len(), 9);
        assert_eq!(slots[0].label(), "08:00-09:00");
        assert_eq!(slots[8].label(), "16:00-17:00");
    }

    #[test]
    fn test_parse_only_accepts_known_slots() {
        assert!(TimeSlot::parse("10:00-11:00").is_some());
        assert!(TimeSlot::parse("10:30-11:30").is_none());
        assert!(TimeSlot::parse("07:00-08:00").is_none());
    }

    #[test]
    fn test_past_slots_disabled_for_today_only() {
        let today = day(2024, 5, 10);
        let now = at(today, 10, 15);
        let nine_to_ten = TimeSlot::parse("09:00-10:00").unwrap();
        let ten_to_eleven = TimeSlot::parse("10:00-11:00").unwrap();

        assert!(nine_to_ten.has_passed(today, now));
        // still running, so not passed
        assert!(!ten_to_eleven.has_passed(today, now));
        // the same slot tomorrow is fine
        assert!(!nine_to_ten.has_passed(today + Duration::days(1), now));
    }

    #[test]
    fn test_slot_passes_exactly_at_end_time() {
        let today = day(2024, 5, 10);
        let slot = TimeSlot::parse("09:00-10:00").unwrap();
        assert!(!slot.has_passed(today, at(today, 9, 59)));
        assert!(slot.has_passed(today, at(today, 10, 0)));
    }

    #[test]
    fn test_booking_window() {
        let today = day(2024, 5, 10);
        assert!(check_booking_window(today, today).is_ok());
        assert!(check_booking_window(today + Duration::days(30), today).is_ok());
        assert!(check_booking_window(today + Duration::days(31), today).is_err());
        assert!(check_booking_window(today - Duration::days(1), today).is_err());
    }

    #[test]
    fn test_availability_marks_full_and_passed_slots() {
        let today = day(2024, 5, 10);
        let now = at(today, 12, 30);
        let mut booked = HashMap::new();
        booked.insert("14:00-15:00".to_string(), 2);
        booked.insert("15:00-16:00".to_string(), 1);

        let slots = availability(today, now, &booked, 2);
        let by_label = |label: &str| slots.iter().find(|s| s.label == label).unwrap().clone();

        assert!(by_label("08:00-09:00").passed);
        assert!(!by_label("08:00-09:00").available);
        assert!(!by_label("12:00-13:00").passed);
        assert!(by_label("12:00-13:00").available);
        assert!(!by_label("14:00-15:00").available);
        assert_eq!(by_label("15:00-16:00").booked, 1);
        assert!(by_label("15:00-16:00").available);
    }

    #[test]
    fn test_ensure_bookable() {
        let today = day(2024, 5, 10);
        let now = at(today, 11, 0);

        assert!(ensure_bookable(today, "13:00-14:00", now, 0, 2).is_ok());
        assert!(matches!(
            ensure_bookable(today, "09:00-10:00", now, 0, 2),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            ensure_bookable(today, "13:00-14:00", now, 2, 2),
            Err(AppError::Conflict(_))
        ));
        assert!(ensure_bookable(today, "13:15-14:15", now, 0, 2).is_err());
        assert!(ensure_bookable(today + Duration::days(1), "09:00-10:00", now, 0, 2).is_ok());
    }
}
