//! Domain services
//!
//! Logic with no database access: route authorization, tokens, password
//! hashing, the booking wizard, slot availability and invoice arithmetic.

pub mod authorization_service;
pub mod booking_wizard;
pub mod invoice_calculator;
pub mod jwt_service;
pub mod password;
pub mod time_slots;

pub use jwt_service::{Claims, JwtService};
