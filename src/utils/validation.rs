//! Validation helpers
//!
//! Form field regexes shared by the request DTOs and the booking wizard,
//! plus small custom validators for `validator` derive attributes.

use chrono::{Datelike, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    /// Person names: letters first, then letters, spaces, dots, apostrophes or hyphens.
    pub static ref NAME_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z .'-]{1,49}$").unwrap();

    /// Local mobile/landline numbers: ten digits starting with 0.
    pub static ref PHONE_RE: Regex = Regex::new(r"^0\d{9}$").unwrap();

    /// Vehicle registration numbers such as `CAB-1234` or `WP-4521`.
    pub static ref VEHICLE_NUMBER_RE: Regex = Regex::new(r"^[A-Z]{2,3}-\d{4}$").unwrap();

    /// Stock keeping units: upper-case letters, digits and dashes.
    pub static ref SKU_RE: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9-]{2,31}$").unwrap();

    /// Largest amount a `NUMERIC(12,2)` column holds.
    pub static ref MAX_MONEY: Decimal = Decimal::new(999_999_999_999, 2);
}

pub const MIN_VEHICLE_YEAR: i32 = 1950;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MONEY_SCALE: u32 = 2;
pub const TAX_RATE_SCALE: u32 = 4;

/// Parse a `YYYY-MM-DD` date
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Passwords need a minimum length and at least one letter and one digit
pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    let long_enough = value.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_letter = value.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_letter && has_digit {
        return Ok(());
    }

    let mut error = ValidationError::new("password");
    error.message = Some(
        format!(
            "Password must be at least {} characters and contain a letter and a digit",
            MIN_PASSWORD_LENGTH
        )
        .into(),
    );
    Err(error)
}

/// Model years from 1950 up to next year's models
pub fn validate_vehicle_year(value: i32) -> Result<(), ValidationError> {
    let max = Utc::now().year() + 1;
    if value < MIN_VEHICLE_YEAR || value > max {
        let mut error = ValidationError::new("year");
        error.add_param("min".into(), &MIN_VEHICLE_YEAR);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Reject strings that are empty once trimmed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Reject negative values
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// `validator` custom hook for `Decimal` money fields: cents precision,
/// non-negative and within `MAX_MONEY`
pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)?;
    if value.normalize().scale() > MONEY_SCALE {
        let mut error = ValidationError::new("money_scale");
        error.message = Some("Amounts cannot have more than 2 decimal places".into());
        error.add_param("value".into(), value);
        return Err(error);
    }
    if *value > *MAX_MONEY {
        let mut error = ValidationError::new("money_range");
        error.add_param("max".into(), &*MAX_MONEY);
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Tax rates are fractions between 0 and 1 with at most 4 decimal places
pub fn validate_tax_rate(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || *value > Decimal::ONE || value.normalize().scale() > TAX_RATE_SCALE {
        let mut error = ValidationError::new("tax_rate");
        error.message = Some("Tax rate must be between 0 and 1 with at most 4 decimal places".into());
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}
