//! Driven ports: persistence traits the domain services depend on.
//!
//! Adapters live under `outbound::persistence`; tests substitute mocks or
//! in-memory stubs. Port errors are generated by [`define_port_error`] so
//! every adapter reports failures in the same two or three shapes.

mod audit_log_repository;
mod assignment_repository;
mod catalogue_repository;
mod failure_reason_repository;
mod inspection_repository;
mod macros;
mod user_repository;
mod vehicle_repository;

pub(crate) use macros::define_port_error;

pub use audit_log_repository::{AuditLogRepository, AuditPersistenceError};
pub use assignment_repository::{AssignmentPersistenceError, AssignmentRepository};
pub use catalogue_repository::{CataloguePersistenceError, CatalogueRepository};
pub use failure_reason_repository::{FailureReasonPersistenceError, FailureReasonRepository};
pub use inspection_repository::{InspectionPersistenceError, InspectionRepository, VerifyOutcome};
pub use user_repository::{UserPersistenceError, UserRepository};
pub use vehicle_repository::{VehiclePersistenceError, VehicleRepository};

#[cfg(test)]
pub use audit_log_repository::MockAuditLogRepository;
#[cfg(test)]
pub use assignment_repository::MockAssignmentRepository;
#[cfg(test)]
pub use inspection_repository::MockInspectionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use vehicle_repository::MockVehicleRepository;
