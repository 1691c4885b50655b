//! Data models
//!
//! Row structs and status enums that map onto the PostgreSQL schema in
//! `migrations/`.

pub mod booking;
pub mod goods_request;
pub mod inventory;
pub mod invoice;
pub mod job;
pub mod leave_request;
pub mod status;
pub mod user;
pub mod vehicle;

pub use status::Lifecycle;
pub use user::Role;
