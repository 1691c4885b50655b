//! Shared utilities
//!
//! Error type and form-field validation helpers.

pub mod errors;
pub mod validation;

pub use errors::{AppError, AppResult};
