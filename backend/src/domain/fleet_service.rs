//! Fleet domain service: vehicle reads, edits, and status transitions.
//!
//! Every transition goes role gate, then state machine, then an optimistic
//! commit of the status/blacklist pair, then an audit append. The audit
//! append is best effort; a failed append is logged and never undoes the
//! mutation it describes.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::domain::audit::{AuditAction, AuditDraft};
use crate::domain::lifecycle::vehicle::{self as vehicle_fsm, VehicleAction, VehicleState};
use crate::domain::optimistic::commit_optimistically;
use crate::domain::ports::{AuditLogRepository, VehiclePersistenceError, VehicleRepository};
use crate::domain::pov::Actor;
use crate::domain::vehicle::{Vehicle, VehicleStatus};
use crate::domain::Error;

/// Table name recorded in audit entries for vehicle mutations.
const VEHICLES_TABLE: &str = "vehicle_equipment";

/// Driving service for the vehicle fleet.
#[derive(Clone)]
pub struct FleetService {
    vehicles: Arc<dyn VehicleRepository>,
    audit: Arc<dyn AuditLogRepository>,
}

fn map_persistence_error(error: VehiclePersistenceError) -> Error {
    match error {
        VehiclePersistenceError::Connection { message } => Error::service_unavailable(message),
        VehiclePersistenceError::Query { message } => Error::internal(message),
        VehiclePersistenceError::DuplicatePlate { plate } => {
            Error::conflict(format!("plate number {plate} is already registered"))
                .with_details(json!({ "field": "plateNumber", "code": "duplicate_plate" }))
        }
    }
}

impl FleetService {
    /// Create a new service over the given adapters.
    pub fn new(vehicles: Arc<dyn VehicleRepository>, audit: Arc<dyn AuditLogRepository>) -> Self {
        Self { vehicles, audit }
    }

    async fn fetch(&self, id: Uuid) -> Result<Vehicle, Error> {
        self.vehicles
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("vehicle not found"))
    }

    async fn record_audit(&self, draft: AuditDraft) {
        if let Err(error) = self.audit.append(&draft).await {
            warn!(%error, table = VEHICLES_TABLE, "audit append failed");
        }
    }

    /// List vehicles for display. Field masking happens at the boundary.
    pub async fn list(&self) -> Result<Vec<Vehicle>, Error> {
        self.vehicles.list().await.map_err(map_persistence_error)
    }

    /// Fetch one vehicle for display.
    pub async fn detail(&self, id: Uuid) -> Result<Vehicle, Error> {
        self.fetch(id).await
    }

    /// Register a new vehicle.
    pub async fn create(&self, actor: &Actor, vehicle: Vehicle) -> Result<Vehicle, Error> {
        if !actor.effective_role().can_manage_fleet() {
            return Err(Error::forbidden("role may not register vehicles"));
        }
        self.vehicles
            .insert(&vehicle)
            .await
            .map_err(map_persistence_error)?;
        self.record_audit(AuditDraft {
            user_id: Some(actor.id),
            user_email: Some(actor.email.clone()),
            user_role: Some(actor.roles.actual()),
            action: AuditAction::Create,
            table_name: VEHICLES_TABLE.to_owned(),
            record_id: vehicle.id.to_string(),
            old_values: None,
            new_values: Some(json!({
                "plate_number": vehicle.plate_number.as_ref(),
                "status": vehicle.status.as_str(),
            })),
        })
        .await;
        Ok(vehicle)
    }

    /// Update a vehicle's editable fields. Status changes go through
    /// [`FleetService::transition`], not here.
    pub async fn update(&self, actor: &Actor, vehicle: Vehicle) -> Result<Vehicle, Error> {
        if !actor.effective_role().can_manage_fleet() {
            return Err(Error::forbidden("role may not edit vehicles"));
        }
        self.vehicles
            .update(&vehicle)
            .await
            .map_err(map_persistence_error)?;
        self.record_audit(AuditDraft {
            user_id: Some(actor.id),
            user_email: Some(actor.email.clone()),
            user_role: Some(actor.roles.actual()),
            action: AuditAction::Update,
            table_name: VEHICLES_TABLE.to_owned(),
            record_id: vehicle.id.to_string(),
            old_values: None,
            new_values: Some(json!({ "plate_number": vehicle.plate_number.as_ref() })),
        })
        .await;
        Ok(vehicle)
    }

    /// Select a status directly.
    pub async fn set_status(
        &self,
        actor: &Actor,
        id: Uuid,
        target: VehicleStatus,
    ) -> Result<Vehicle, Error> {
        self.transition(actor, id, VehicleAction::SetStatus(target))
            .await
    }

    /// Bar a vehicle from operation.
    pub async fn blacklist(&self, actor: &Actor, id: Uuid) -> Result<Vehicle, Error> {
        self.transition(actor, id, VehicleAction::Blacklist).await
    }

    /// Return a vehicle to normal operation.
    pub async fn unblacklist(
        &self,
        actor: &Actor,
        id: Uuid,
        target: Option<VehicleStatus>,
    ) -> Result<Vehicle, Error> {
        self.transition(actor, id, VehicleAction::Unblacklist { target })
            .await
    }

    async fn transition(
        &self,
        actor: &Actor,
        id: Uuid,
        action: VehicleAction,
    ) -> Result<Vehicle, Error> {
        let mut vehicle = self.fetch(id).await?;
        let current = VehicleState {
            status: vehicle.status,
            blacklisted: vehicle.blacklisted,
        };
        let next = match vehicle_fsm::apply(current, &action) {
            Ok(next) => next,
            Err(error) => return Err(Error::conflict(error.to_string())),
        };
        if !vehicle_fsm::can_transition(current, &action, actor.effective_role()) {
            return Err(Error::forbidden("role may not change this vehicle's status"));
        }

        let old_values = json!({
            "status": current.status.as_str(),
            "blacklisted": current.blacklisted,
        });
        let repo = Arc::clone(&self.vehicles);
        commit_optimistically(
            &mut vehicle,
            |v| {
                v.status = next.status;
                v.blacklisted = next.blacklisted;
                v.updated_at = Utc::now();
            },
            |updated| async move {
                repo.update_status(updated.id, updated.status, updated.blacklisted)
                    .await
            },
        )
        .await
        .map_err(map_persistence_error)?;

        self.record_audit(AuditDraft {
            user_id: Some(actor.id),
            user_email: Some(actor.email.clone()),
            user_role: Some(actor.roles.actual()),
            action: AuditAction::Update,
            table_name: VEHICLES_TABLE.to_owned(),
            record_id: vehicle.id.to_string(),
            old_values: Some(old_values),
            new_values: Some(json!({
                "status": vehicle.status.as_str(),
                "blacklisted": vehicle.blacklisted,
            })),
        })
        .await;
        Ok(vehicle)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockAuditLogRepository, MockVehicleRepository};
    use crate::domain::pov::RoleContext;
    use crate::domain::role::Role;
    use crate::domain::vehicle::PlateNumber;
    use crate::domain::ErrorCode;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            email: "actor@example.com".to_owned(),
            roles: RoleContext::new(role, None),
        }
    }

    fn vehicle(status: VehicleStatus, blacklisted: bool) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            plate_number: PlateNumber::new("ABC1234").expect("valid plate"),
            driver_name: Some("John Smith".to_owned()),
            national_id: None,
            company_id: None,
            equipment_type_id: None,
            year_of_manufacture: None,
            project: None,
            gate: None,
            status,
            next_inspection_date: None,
            blacklisted,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn quiet_audit() -> MockAuditLogRepository {
        let mut audit = MockAuditLogRepository::new();
        audit.expect_append().returning(|_| Ok(()));
        audit
    }

    #[tokio::test]
    async fn blacklisting_sets_flag_and_status() {
        let existing = vehicle(VehicleStatus::Rejected, false);
        let id = existing.id;
        let mut repo = MockVehicleRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update_status()
            .withf(move |vid, status, blacklisted| {
                *vid == id && *status == VehicleStatus::Blacklisted && *blacklisted
            })
            .times(1)
            .return_once(|_, _, _| Ok(()));

        let service = FleetService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let updated = service
            .blacklist(&actor(Role::Admin), id)
            .await
            .expect("blacklist succeeds");
        assert_eq!(updated.status, VehicleStatus::Blacklisted);
        assert!(updated.blacklisted);
    }

    #[tokio::test]
    async fn unblacklist_defaults_target_status() {
        let existing = vehicle(VehicleStatus::Blacklisted, true);
        let id = existing.id;
        let mut repo = MockVehicleRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update_status()
            .withf(|_, status, blacklisted| {
                *status == VehicleStatus::UpdatedInspectionRequired && !*blacklisted
            })
            .times(1)
            .return_once(|_, _, _| Ok(()));

        let service = FleetService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let updated = service
            .unblacklist(&actor(Role::Owner), id, None)
            .await
            .expect("un-blacklist succeeds");
        assert_eq!(updated.status, VehicleStatus::UpdatedInspectionRequired);
        assert!(!updated.blacklisted);
    }

    #[tokio::test]
    async fn inspectors_may_not_blacklist() {
        let existing = vehicle(VehicleStatus::Verified, false);
        let id = existing.id;
        let mut repo = MockVehicleRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update_status().times(0);

        let service = FleetService::new(Arc::new(repo), Arc::new(MockAuditLogRepository::new()));
        let error = service
            .blacklist(&actor(Role::Inspector), id)
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn rejected_write_rolls_back_and_surfaces_retryable_error() {
        let existing = vehicle(VehicleStatus::Verified, false);
        let id = existing.id;
        let mut repo = MockVehicleRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update_status()
            .return_once(|_, _, _| Err(VehiclePersistenceError::query("write rejected")));

        let service = FleetService::new(Arc::new(repo), Arc::new(MockAuditLogRepository::new()));
        let error = service
            .set_status(&actor(Role::Admin), id, VehicleStatus::Rejected)
            .await
            .expect_err("write failure surfaces");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn direct_selection_while_blacklisted_conflicts() {
        let existing = vehicle(VehicleStatus::Blacklisted, true);
        let id = existing.id;
        let mut repo = MockVehicleRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update_status().times(0);

        let service = FleetService::new(Arc::new(repo), Arc::new(MockAuditLogRepository::new()));
        let error = service
            .set_status(&actor(Role::Admin), id, VehicleStatus::Verified)
            .await
            .expect_err("conflict");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }
}
