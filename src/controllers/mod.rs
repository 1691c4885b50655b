pub mod auth_controller;
pub mod booking_controller;
pub mod goods_request_controller;
pub mod inventory_controller;
pub mod invoice_controller;
pub mod job_controller;
pub mod leave_controller;
pub mod user_controller;
