//! Status lifecycles
//!
//! Every status enum declares which moves are legal; controllers call
//! `transition` and never write a status that skipped the table.

use std::fmt::Display;

use crate::utils::errors::AppError;

pub trait Lifecycle: Copy + PartialEq + Display {
    fn can_transition_to(&self, next: Self) -> bool;

    fn transition(self, next: Self) -> Result<Self, AppError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

/// Implements `Display` through the enum's `as_str`.
macro_rules! display_as_str {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use display_as_str;
