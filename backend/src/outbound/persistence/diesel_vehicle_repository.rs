//! PostgreSQL-backed `VehicleRepository` implementation using Diesel.
//!
//! Status writes touch only the status/blacklist pair and filter on the
//! primary key alone; two administrators racing on the same vehicle are
//! last-write-wins with no conflict signal.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{VehiclePersistenceError, VehicleRepository};
use crate::domain::{Vehicle, VehicleStatus};

use super::error_map::{
    classify_conversion_error, classify_diesel_error, classify_pool_error, DbErrorKind,
};
use super::models::VehicleRow;
use super::pool::DbPool;
use super::schema::vehicle_equipment;

/// Diesel-backed implementation of the `VehicleRepository` port.
#[derive(Clone)]
pub struct DieselVehicleRepository {
    pool: DbPool,
}

impl DieselVehicleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(kind: DbErrorKind) -> VehiclePersistenceError {
    match kind {
        DbErrorKind::Connection(message) => VehiclePersistenceError::connection(message),
        DbErrorKind::Query(message) => VehiclePersistenceError::query(message),
        DbErrorKind::UniqueViolation(message) => VehiclePersistenceError::duplicate_plate(message),
    }
}

#[async_trait]
impl VehicleRepository for DieselVehicleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, VehiclePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let row: Option<VehicleRow> = vehicle_equipment::table
            .filter(vehicle_equipment::id.eq(id))
            .select(VehicleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| map_error(classify_diesel_error(e)))?;

        row.map(Vehicle::try_from)
            .transpose()
            .map_err(|e| map_error(classify_conversion_error(e)))
    }

    async fn list(&self) -> Result<Vec<Vehicle>, VehiclePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let rows: Vec<VehicleRow> = vehicle_equipment::table
            .order(vehicle_equipment::created_at.desc())
            .select(VehicleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_error(classify_diesel_error(e)))?;

        rows.into_iter()
            .map(|row| Vehicle::try_from(row).map_err(|e| map_error(classify_conversion_error(e))))
            .collect()
    }

    async fn insert(&self, vehicle: &Vehicle) -> Result<(), VehiclePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::insert_into(vehicle_equipment::table)
            .values(VehicleRow::from(vehicle))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn update(&self, vehicle: &Vehicle) -> Result<(), VehiclePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::update(vehicle_equipment::table.filter(vehicle_equipment::id.eq(vehicle.id)))
            .set(VehicleRow::from(vehicle))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: VehicleStatus,
        blacklisted: bool,
    ) -> Result<(), VehiclePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::update(vehicle_equipment::table.filter(vehicle_equipment::id.eq(id)))
            .set((
                vehicle_equipment::status.eq(status.as_str()),
                vehicle_equipment::blacklisted.eq(blacklisted),
                vehicle_equipment::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping coverage; behaviour against a live database is covered
    //! by the service tests over the port.
    use super::*;

    #[test]
    fn unique_violations_map_to_duplicate_plate() {
        let err = map_error(DbErrorKind::UniqueViolation("plate taken".to_owned()));
        assert!(matches!(
            err,
            VehiclePersistenceError::DuplicatePlate { .. }
        ));
    }

    #[test]
    fn connection_failures_keep_their_message() {
        let err = map_error(DbErrorKind::Connection("pool exhausted".to_owned()));
        assert!(err.to_string().contains("pool exhausted"));
    }
}
