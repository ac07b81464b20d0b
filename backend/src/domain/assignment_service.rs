//! Assignment domain service: bookings, edits, and status changes.
//!
//! The one subtle rule lives in the edit path: moving the scheduled date of
//! an assignment that is still in its original `Assigned` state turns it
//! `Rescheduled` as a side effect of the edit. A fulfilled assignment is
//! frozen entirely.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::domain::assignment::{Assignment, AssignmentStatus};
use crate::domain::audit::{AuditAction, AuditDraft};
use crate::domain::failure_reason::FailureReason;
use crate::domain::inspection::{Inspection, InspectionResult, InspectionStatus, InspectionType};
use crate::domain::lifecycle::assignment::{self as assignment_fsm, AssignmentAction};
use crate::domain::optimistic::commit_optimistically;
use crate::domain::ports::{
    AssignmentPersistenceError, AssignmentRepository, AuditLogRepository,
    InspectionPersistenceError, InspectionRepository,
};
use crate::domain::pov::Actor;
use crate::domain::Error;

/// Table name recorded in audit entries for assignment mutations.
const ASSIGNMENTS_TABLE: &str = "assignments";

/// Request payload for creating an assignment.
#[derive(Debug, Clone)]
pub struct CreateAssignmentRequest {
    pub company_id: Uuid,
    pub inspector_id: Option<Uuid>,
    pub scheduled_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Request payload for editing an assignment.
#[derive(Debug, Clone)]
pub struct EditAssignmentRequest {
    pub company_id: Uuid,
    pub inspector_id: Option<Uuid>,
    pub scheduled_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Request payload for spawning an inspection from an assignment.
#[derive(Debug, Clone)]
pub struct AssignmentInspectionRequest {
    pub vehicle_id: Uuid,
    pub inspection_type: InspectionType,
    pub scheduled_date: DateTime<Utc>,
}

/// Driving service for assignments.
#[derive(Clone)]
pub struct AssignmentService {
    assignments: Arc<dyn AssignmentRepository>,
    inspections: Arc<dyn InspectionRepository>,
    audit: Arc<dyn AuditLogRepository>,
}

fn map_persistence_error(error: AssignmentPersistenceError) -> Error {
    match error {
        AssignmentPersistenceError::Connection { message } => Error::service_unavailable(message),
        AssignmentPersistenceError::Query { message } => Error::internal(message),
    }
}

fn map_inspection_error(error: InspectionPersistenceError) -> Error {
    match error {
        InspectionPersistenceError::Connection { message } => Error::service_unavailable(message),
        InspectionPersistenceError::Query { message } => Error::internal(message),
    }
}

impl AssignmentService {
    /// Create a new service over the given adapters.
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        inspections: Arc<dyn InspectionRepository>,
        audit: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self {
            assignments,
            inspections,
            audit,
        }
    }

    fn ensure_may_manage(actor: &Actor) -> Result<(), Error> {
        if actor.effective_role().can_manage_assignments() {
            Ok(())
        } else {
            Err(Error::forbidden("role may not manage assignments"))
        }
    }

    async fn fetch(&self, id: Uuid) -> Result<Assignment, Error> {
        self.assignments
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("assignment not found"))
    }

    async fn record_audit(
        &self,
        actor: &Actor,
        action: AuditAction,
        assignment: &Assignment,
        old_values: Option<serde_json::Value>,
    ) {
        let draft = AuditDraft {
            user_id: Some(actor.id),
            user_email: Some(actor.email.clone()),
            user_role: Some(actor.roles.actual()),
            action,
            table_name: ASSIGNMENTS_TABLE.to_owned(),
            record_id: assignment.id.to_string(),
            old_values,
            new_values: Some(json!({
                "status": assignment.status.as_str(),
                "scheduled_date": assignment.scheduled_date,
            })),
        };
        if let Err(error) = self.audit.append(&draft).await {
            warn!(%error, table = ASSIGNMENTS_TABLE, "audit append failed");
        }
    }

    /// List assignments for display.
    pub async fn list(&self) -> Result<Vec<Assignment>, Error> {
        self.assignments.list().await.map_err(map_persistence_error)
    }

    /// Fetch one assignment for display.
    pub async fn detail(&self, id: Uuid) -> Result<Assignment, Error> {
        self.fetch(id).await
    }

    /// Book a company for inspection.
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateAssignmentRequest,
    ) -> Result<Assignment, Error> {
        Self::ensure_may_manage(actor)?;
        let now = Utc::now();
        let assignment = Assignment {
            id: Uuid::new_v4(),
            company_id: request.company_id,
            inspector_id: request.inspector_id,
            scheduled_date: request.scheduled_date,
            status: AssignmentStatus::Assigned,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };
        self.assignments
            .insert(&assignment)
            .await
            .map_err(map_persistence_error)?;
        self.record_audit(actor, AuditAction::Assign, &assignment, None)
            .await;
        Ok(assignment)
    }

    /// Edit an assignment, applying the reschedule side effect when the date
    /// moves.
    pub async fn edit(
        &self,
        actor: &Actor,
        id: Uuid,
        request: EditAssignmentRequest,
    ) -> Result<Assignment, Error> {
        Self::ensure_may_manage(actor)?;
        let mut assignment = self.fetch(id).await?;

        let date_changed = assignment.scheduled_date != request.scheduled_date;
        let next_status = assignment_fsm::status_after_edit(assignment.status, date_changed)
            .map_err(|error| Error::conflict(error.to_string()))?;

        let old_values = json!({
            "status": assignment.status.as_str(),
            "scheduled_date": assignment.scheduled_date,
        });
        let repo = Arc::clone(&self.assignments);
        commit_optimistically(
            &mut assignment,
            |a| {
                a.company_id = request.company_id;
                a.inspector_id = request.inspector_id;
                a.scheduled_date = request.scheduled_date;
                a.notes = request.notes.clone();
                a.status = next_status;
                a.updated_at = Utc::now();
            },
            |updated| async move { repo.update(&updated).await },
        )
        .await
        .map_err(map_persistence_error)?;

        self.record_audit(actor, AuditAction::Update, &assignment, Some(old_values))
            .await;
        Ok(assignment)
    }

    /// Mark an assignment fulfilled. Terminal.
    pub async fn mark_done(&self, actor: &Actor, id: Uuid) -> Result<Assignment, Error> {
        self.transition(actor, id, AssignmentAction::MarkDone).await
    }

    /// Flag an assignment as slipped.
    pub async fn mark_delayed(&self, actor: &Actor, id: Uuid) -> Result<Assignment, Error> {
        self.transition(actor, id, AssignmentAction::MarkDelayed)
            .await
    }

    async fn transition(
        &self,
        actor: &Actor,
        id: Uuid,
        action: AssignmentAction,
    ) -> Result<Assignment, Error> {
        Self::ensure_may_manage(actor)?;
        let mut assignment = self.fetch(id).await?;
        let next = assignment_fsm::apply(assignment.status, &action)
            .map_err(|error| Error::conflict(error.to_string()))?;

        let old_values = json!({ "status": assignment.status.as_str() });
        let repo = Arc::clone(&self.assignments);
        commit_optimistically(
            &mut assignment,
            |a| {
                a.status = next;
                a.updated_at = Utc::now();
            },
            |updated| async move { repo.set_status(updated.id, updated.status).await },
        )
        .await
        .map_err(map_persistence_error)?;

        self.record_audit(actor, AuditAction::Update, &assignment, Some(old_values))
            .await;
        Ok(assignment)
    }

    /// Spawn an inspection for an open assignment. Leaves the assignment
    /// untouched.
    pub async fn create_inspection(
        &self,
        actor: &Actor,
        assignment_id: Uuid,
        request: AssignmentInspectionRequest,
    ) -> Result<Inspection, Error> {
        if !actor.effective_role().can_schedule_inspections() {
            return Err(Error::forbidden("role may not schedule inspections"));
        }
        let assignment = self.fetch(assignment_id).await?;
        if !assignment_fsm::can_create_inspection(assignment.status) {
            return Err(Error::conflict(
                "assignment is done; no further inspections can be created from it",
            ));
        }

        let now = Utc::now();
        let inspection = Inspection {
            id: Uuid::new_v4(),
            vehicle_id: request.vehicle_id,
            inspection_type: request.inspection_type,
            assignment_id: Some(assignment.id),
            assigned_inspector_id: assignment.inspector_id,
            assigned_by: Some(actor.id),
            scheduled_date: request.scheduled_date,
            started_at: None,
            completed_at: None,
            result: InspectionResult::Pending,
            failure_reason: FailureReason::empty(),
            notes: None,
            verified_by: None,
            verified_at: None,
            status: InspectionStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        self.inspections
            .insert(&inspection)
            .await
            .map_err(map_inspection_error)?;
        self.record_audit(actor, AuditAction::Assign, &assignment, None)
            .await;
        Ok(inspection)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockAssignmentRepository, MockAuditLogRepository, MockInspectionRepository,
    };
    use crate::domain::pov::RoleContext;
    use crate::domain::role::Role;
    use crate::domain::ErrorCode;
    use chrono::Duration;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            email: "actor@example.com".to_owned(),
            roles: RoleContext::new(role, None),
        }
    }

    fn assignment(status: AssignmentStatus) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            inspector_id: None,
            scheduled_date: now,
            status,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn quiet_audit() -> MockAuditLogRepository {
        let mut audit = MockAuditLogRepository::new();
        audit.expect_append().returning(|_| Ok(()));
        audit
    }

    fn edit_request(base: &Assignment, scheduled_date: DateTime<Utc>) -> EditAssignmentRequest {
        EditAssignmentRequest {
            company_id: base.company_id,
            inspector_id: base.inspector_id,
            scheduled_date,
            notes: Some("gate 3".to_owned()),
        }
    }

    fn service(
        assignments: MockAssignmentRepository,
        inspections: MockInspectionRepository,
        audit: MockAuditLogRepository,
    ) -> AssignmentService {
        AssignmentService::new(Arc::new(assignments), Arc::new(inspections), Arc::new(audit))
    }

    #[tokio::test]
    async fn moving_the_date_reschedules_an_assigned_booking() {
        let existing = assignment(AssignmentStatus::Assigned);
        let id = existing.id;
        let new_date = existing.scheduled_date + Duration::days(2);
        let request = edit_request(&existing, new_date);

        let mut repo = MockAssignmentRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update()
            .withf(move |a: &Assignment| {
                a.status == AssignmentStatus::Rescheduled && a.scheduled_date == new_date
            })
            .times(1)
            .return_once(|_| Ok(()));

        let service = service(repo, MockInspectionRepository::new(), quiet_audit());
        let updated = service
            .edit(&actor(Role::Admin), id, request)
            .await
            .expect("edit succeeds");
        assert_eq!(updated.status, AssignmentStatus::Rescheduled);
    }

    #[tokio::test]
    async fn editing_without_a_date_change_keeps_the_status() {
        let existing = assignment(AssignmentStatus::Assigned);
        let id = existing.id;
        let request = edit_request(&existing, existing.scheduled_date);

        let mut repo = MockAssignmentRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update()
            .withf(|a: &Assignment| a.status == AssignmentStatus::Assigned)
            .times(1)
            .return_once(|_| Ok(()));

        let service = service(repo, MockInspectionRepository::new(), quiet_audit());
        let updated = service
            .edit(&actor(Role::Owner), id, request)
            .await
            .expect("edit succeeds");
        assert_eq!(updated.status, AssignmentStatus::Assigned);
    }

    #[tokio::test]
    async fn done_assignments_refuse_edits() {
        let existing = assignment(AssignmentStatus::Done);
        let id = existing.id;
        let request = edit_request(&existing, existing.scheduled_date + Duration::days(1));

        let mut repo = MockAssignmentRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_update().times(0);

        let service = service(repo, MockInspectionRepository::new(), MockAuditLogRepository::new());
        let error = service
            .edit(&actor(Role::Admin), id, request)
            .await
            .expect_err("conflict");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn rejected_status_write_rolls_back_the_local_copy() {
        let existing = assignment(AssignmentStatus::Delayed);
        let id = existing.id;
        let mut repo = MockAssignmentRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_set_status()
            .return_once(|_, _| Err(AssignmentPersistenceError::query("write rejected")));

        let service = service(repo, MockInspectionRepository::new(), MockAuditLogRepository::new());
        let error = service
            .mark_done(&actor(Role::Inspector), id)
            .await
            .expect_err("write failure surfaces");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn inspections_cannot_spawn_from_done_assignments() {
        let existing = assignment(AssignmentStatus::Done);
        let id = existing.id;
        let mut repo = MockAssignmentRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        let mut inspections = MockInspectionRepository::new();
        inspections.expect_insert().times(0);

        let service = service(repo, inspections, MockAuditLogRepository::new());
        let error = service
            .create_inspection(
                &actor(Role::Admin),
                id,
                AssignmentInspectionRequest {
                    vehicle_id: Uuid::new_v4(),
                    inspection_type: InspectionType::Routine,
                    scheduled_date: Utc::now(),
                },
            )
            .await
            .expect_err("conflict");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn spawned_inspection_inherits_the_assignment_inspector() {
        let mut existing = assignment(AssignmentStatus::Rescheduled);
        let inspector = Uuid::new_v4();
        existing.inspector_id = Some(inspector);
        let id = existing.id;
        let mut repo = MockAssignmentRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        let mut inspections = MockInspectionRepository::new();
        inspections
            .expect_insert()
            .withf(move |i: &Inspection| {
                i.assignment_id == Some(id) && i.assigned_inspector_id == Some(inspector)
            })
            .times(1)
            .return_once(|_| Ok(()));

        let service = service(repo, inspections, quiet_audit());
        let inspection = service
            .create_inspection(
                &actor(Role::Admin),
                id,
                AssignmentInspectionRequest {
                    vehicle_id: Uuid::new_v4(),
                    inspection_type: InspectionType::FollowUp,
                    scheduled_date: Utc::now(),
                },
            )
            .await
            .expect("creation succeeds");
        assert_eq!(inspection.status, InspectionStatus::Scheduled);
    }

    #[tokio::test]
    async fn contractors_may_not_manage_assignments() {
        let service = service(
            MockAssignmentRepository::new(),
            MockInspectionRepository::new(),
            MockAuditLogRepository::new(),
        );
        let error = service
            .mark_done(&actor(Role::Contractor), Uuid::new_v4())
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }
}
