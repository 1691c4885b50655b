//! Database
//!
//! PostgreSQL connection handling and migrations.

pub mod connection;

pub use connection::DatabaseConnection;
