//! Port abstraction for vehicle persistence adapters and their errors.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::vehicle::{Vehicle, VehicleStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by vehicle repository adapters.
    pub enum VehiclePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "vehicle repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "vehicle repository query failed: {message}",
        /// Another vehicle already carries this plate number.
        DuplicatePlate { plate: String } => "plate number {plate} is already registered",
    }
}

/// Persistence port for vehicles and equipment.
///
/// Status writes touch only the status/blacklist pair and key on the primary
/// key alone; concurrent writers are last-write-wins by design.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Fetch a vehicle by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, VehiclePersistenceError>;

    /// List vehicles, newest first.
    async fn list(&self) -> Result<Vec<Vehicle>, VehiclePersistenceError>;

    /// Insert a new vehicle record.
    async fn insert(&self, vehicle: &Vehicle) -> Result<(), VehiclePersistenceError>;

    /// Update an existing vehicle's editable fields.
    async fn update(&self, vehicle: &Vehicle) -> Result<(), VehiclePersistenceError>;

    /// Write the status/blacklist pair for one vehicle.
    async fn update_status(
        &self,
        id: Uuid,
        status: VehicleStatus,
        blacklisted: bool,
    ) -> Result<(), VehiclePersistenceError>;
}
