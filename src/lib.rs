//! Pitstop
//!
//! REST backend for an automotive service shop: bookings, jobs, inventory,
//! goods requests, invoices, leave requests and user administration.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;
