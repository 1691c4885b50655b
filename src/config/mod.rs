//! Configuration
//!
//! Environment settings and database pool configuration.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::*;
