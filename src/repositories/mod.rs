pub mod booking_repository;
pub mod goods_request_repository;
pub mod inventory_repository;
pub mod invoice_repository;
pub mod job_repository;
pub mod leave_repository;
pub mod user_repository;
pub mod vehicle_repository;
