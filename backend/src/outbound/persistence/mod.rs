//! Diesel/PostgreSQL adapters for the domain's persistence ports.

mod diesel_assignment_repository;
mod diesel_audit_log_repository;
mod diesel_catalogue_repository;
mod diesel_failure_reason_repository;
mod diesel_inspection_repository;
mod diesel_user_repository;
mod diesel_vehicle_repository;
mod error_map;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_assignment_repository::DieselAssignmentRepository;
pub use diesel_audit_log_repository::DieselAuditLogRepository;
pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_failure_reason_repository::DieselFailureReasonRepository;
pub use diesel_inspection_repository::DieselInspectionRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vehicle_repository::DieselVehicleRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
