//! In-memory port adapters for integration tests that need no database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use fleetgate::domain::ports::{
    AssignmentPersistenceError, AssignmentRepository, AuditLogRepository, AuditPersistenceError,
    InspectionPersistenceError, InspectionRepository, VehiclePersistenceError, VehicleRepository,
    VerifyOutcome,
};
use fleetgate::domain::{
    Actor, Assignment, AssignmentStatus, AuditDraft, AuditEntry, ChecklistItem, Inspection, Role,
    RoleContext, Vehicle, VehicleStatus,
};

/// Build an actor with the given role and a fresh identity.
pub fn actor(role: Role) -> Actor {
    Actor {
        id: Uuid::new_v4(),
        email: format!("{role}@example.com"),
        roles: RoleContext::new(role, None),
    }
}

/// Vehicle store backed by a mutex-guarded map.
#[derive(Default)]
pub struct InMemoryVehicles {
    rows: Mutex<HashMap<Uuid, Vehicle>>,
}

impl InMemoryVehicles {
    pub fn with(vehicle: Vehicle) -> Self {
        let store = Self::default();
        store
            .rows
            .lock()
            .expect("vehicle store lock")
            .insert(vehicle.id, vehicle);
        store
    }

    pub fn get(&self, id: Uuid) -> Option<Vehicle> {
        self.rows.lock().expect("vehicle store lock").get(&id).cloned()
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicles {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, VehiclePersistenceError> {
        Ok(self.get(id))
    }

    async fn list(&self) -> Result<Vec<Vehicle>, VehiclePersistenceError> {
        Ok(self
            .rows
            .lock()
            .expect("vehicle store lock")
            .values()
            .cloned()
            .collect())
    }

    async fn insert(&self, vehicle: &Vehicle) -> Result<(), VehiclePersistenceError> {
        self.rows
            .lock()
            .expect("vehicle store lock")
            .insert(vehicle.id, vehicle.clone());
        Ok(())
    }

    async fn update(&self, vehicle: &Vehicle) -> Result<(), VehiclePersistenceError> {
        self.insert(vehicle).await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: VehicleStatus,
        blacklisted: bool,
    ) -> Result<(), VehiclePersistenceError> {
        let mut rows = self.rows.lock().expect("vehicle store lock");
        let vehicle = rows
            .get_mut(&id)
            .ok_or_else(|| VehiclePersistenceError::query("no such vehicle"))?;
        vehicle.status = status;
        vehicle.blacklisted = blacklisted;
        Ok(())
    }
}

/// Inspection store with the same conditional verify the real adapter issues.
#[derive(Default)]
pub struct InMemoryInspections {
    rows: Mutex<HashMap<Uuid, Inspection>>,
    checklist: Mutex<Vec<ChecklistItem>>,
}

impl InMemoryInspections {
    pub fn with(inspection: Inspection) -> Self {
        let store = Self::default();
        store
            .rows
            .lock()
            .expect("inspection store lock")
            .insert(inspection.id, inspection);
        store
    }

    pub fn get(&self, id: Uuid) -> Option<Inspection> {
        self.rows
            .lock()
            .expect("inspection store lock")
            .get(&id)
            .cloned()
    }

    fn write<T>(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut Inspection) -> T,
    ) -> Result<T, InspectionPersistenceError> {
        let mut rows = self.rows.lock().expect("inspection store lock");
        let inspection = rows
            .get_mut(&id)
            .ok_or_else(|| InspectionPersistenceError::query("no such inspection"))?;
        Ok(apply(inspection))
    }
}

#[async_trait]
impl InspectionRepository for InMemoryInspections {
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Inspection>, InspectionPersistenceError> {
        // Snapshot then yield at the await boundary, as a real async adapter
        // does at its I/O points, so concurrent verifies can interleave.
        let snapshot = self.get(id);
        tokio::task::yield_now().await;
        Ok(snapshot)
    }

    async fn list(&self) -> Result<Vec<Inspection>, InspectionPersistenceError> {
        Ok(self
            .rows
            .lock()
            .expect("inspection store lock")
            .values()
            .cloned()
            .collect())
    }

    async fn list_for_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<Inspection>, InspectionPersistenceError> {
        Ok(self
            .rows
            .lock()
            .expect("inspection store lock")
            .values()
            .filter(|i| i.vehicle_id == vehicle_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, inspection: &Inspection) -> Result<(), InspectionPersistenceError> {
        self.rows
            .lock()
            .expect("inspection store lock")
            .insert(inspection.id, inspection.clone());
        Ok(())
    }

    async fn record_start(
        &self,
        inspection: &Inspection,
    ) -> Result<(), InspectionPersistenceError> {
        let update = inspection.clone();
        self.write(inspection.id, move |row| *row = update)
    }

    async fn record_submission(
        &self,
        inspection: &Inspection,
    ) -> Result<(), InspectionPersistenceError> {
        let update = inspection.clone();
        self.write(inspection.id, move |row| *row = update)
    }

    async fn record_cancellation(
        &self,
        inspection: &Inspection,
    ) -> Result<(), InspectionPersistenceError> {
        let update = inspection.clone();
        self.write(inspection.id, move |row| *row = update)
    }

    async fn verify(
        &self,
        id: Uuid,
        verified_by: Uuid,
        verified_at: DateTime<Utc>,
    ) -> Result<VerifyOutcome, InspectionPersistenceError> {
        // Single guarded write, as the SQL adapter's conditional update.
        self.write(id, move |row| {
            if row.verified_at.is_some() {
                VerifyOutcome::AlreadyVerified
            } else {
                row.verified_by = Some(verified_by);
                row.verified_at = Some(verified_at);
                VerifyOutcome::Verified
            }
        })
    }

    async fn append_checklist(
        &self,
        items: &[ChecklistItem],
    ) -> Result<(), InspectionPersistenceError> {
        self.checklist
            .lock()
            .expect("checklist lock")
            .extend_from_slice(items);
        Ok(())
    }
}

/// Assignment store backed by a mutex-guarded map.
#[derive(Default)]
pub struct InMemoryAssignments {
    rows: Mutex<HashMap<Uuid, Assignment>>,
}

impl InMemoryAssignments {
    pub fn with(assignment: Assignment) -> Self {
        let store = Self::default();
        store
            .rows
            .lock()
            .expect("assignment store lock")
            .insert(assignment.id, assignment);
        store
    }

    pub fn get(&self, id: Uuid) -> Option<Assignment> {
        self.rows
            .lock()
            .expect("assignment store lock")
            .get(&id)
            .cloned()
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignments {
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Assignment>, AssignmentPersistenceError> {
        Ok(self.get(id))
    }

    async fn list(&self) -> Result<Vec<Assignment>, AssignmentPersistenceError> {
        Ok(self
            .rows
            .lock()
            .expect("assignment store lock")
            .values()
            .cloned()
            .collect())
    }

    async fn insert(&self, assignment: &Assignment) -> Result<(), AssignmentPersistenceError> {
        self.rows
            .lock()
            .expect("assignment store lock")
            .insert(assignment.id, assignment.clone());
        Ok(())
    }

    async fn update(&self, assignment: &Assignment) -> Result<(), AssignmentPersistenceError> {
        self.insert(assignment).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AssignmentStatus,
    ) -> Result<(), AssignmentPersistenceError> {
        let mut rows = self.rows.lock().expect("assignment store lock");
        let assignment = rows
            .get_mut(&id)
            .ok_or_else(|| AssignmentPersistenceError::query("no such assignment"))?;
        assignment.status = status;
        Ok(())
    }
}

/// Audit adapter that records appended drafts for assertions.
#[derive(Default)]
pub struct RecordingAudit {
    entries: Mutex<Vec<AuditDraft>>,
}

impl RecordingAudit {
    pub fn drafts(&self) -> Vec<AuditDraft> {
        self.entries.lock().expect("audit lock").clone()
    }
}

#[async_trait]
impl AuditLogRepository for RecordingAudit {
    async fn append(&self, draft: &AuditDraft) -> Result<(), AuditPersistenceError> {
        self.entries.lock().expect("audit lock").push(draft.clone());
        Ok(())
    }

    async fn list_recent(&self, _limit: i64) -> Result<Vec<AuditEntry>, AuditPersistenceError> {
        Ok(Vec::new())
    }
}
