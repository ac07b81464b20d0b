//! Inspection domain service: scheduling, submission, cancellation, verify.
//!
//! Verification is the one write in the system with a genuine at-most-once
//! guarantee. The service validates state locally, but the decision is made
//! by the store's conditional update; a lost race comes back as
//! `AlreadyVerified` and is answered with refreshed state instead of an
//! error page.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::domain::audit::{AuditAction, AuditDraft};
use crate::domain::failure_reason::FailureReason;
use crate::domain::inspection::{
    ChecklistItem, Inspection, InspectionResult, InspectionStatus, InspectionType,
};
use crate::domain::lifecycle::inspection::{self as inspection_fsm, InspectionAction,
    InspectionState, InspectionTransitionError};
use crate::domain::optimistic::commit_optimistically;
use crate::domain::ports::{
    AuditLogRepository, InspectionPersistenceError, InspectionRepository, VerifyOutcome,
};
use crate::domain::pov::Actor;
use crate::domain::role::Role;
use crate::domain::Error;

/// Table name recorded in audit entries for inspection mutations.
const INSPECTIONS_TABLE: &str = "inspections";

/// Request payload for scheduling a new inspection.
#[derive(Debug, Clone)]
pub struct ScheduleInspectionRequest {
    pub vehicle_id: Uuid,
    pub inspection_type: InspectionType,
    pub assignment_id: Option<Uuid>,
    pub assigned_inspector_id: Option<Uuid>,
    pub scheduled_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// One checklist line captured with a submission.
#[derive(Debug, Clone)]
pub struct ChecklistDraft {
    pub item_name: String,
    pub item_description: Option<String>,
    pub passed: Option<bool>,
    pub notes: Option<String>,
}

/// Request payload for submitting an inspection result.
#[derive(Debug, Clone)]
pub struct SubmitInspectionRequest {
    pub result: InspectionResult,
    pub failure_reason: FailureReason,
    pub notes: Option<String>,
    pub checklist: Vec<ChecklistDraft>,
}

/// Outcome of a verify call.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyResponse {
    pub inspection: Inspection,
    /// True when another verifier completed the sign-off first and this call
    /// only refreshed state.
    pub already_verified: bool,
}

/// Driving service for inspections.
#[derive(Clone)]
pub struct InspectionService {
    inspections: Arc<dyn InspectionRepository>,
    audit: Arc<dyn AuditLogRepository>,
}

fn map_persistence_error(error: InspectionPersistenceError) -> Error {
    match error {
        InspectionPersistenceError::Connection { message } => Error::service_unavailable(message),
        InspectionPersistenceError::Query { message } => Error::internal(message),
    }
}

fn map_transition_error(error: InspectionTransitionError) -> Error {
    match error {
        InspectionTransitionError::IndecisiveResult
        | InspectionTransitionError::MissingFailureReason => {
            Error::invalid_request(error.to_string())
                .with_details(json!({ "field": "failureReason" }))
        }
        InspectionTransitionError::Closed { .. }
        | InspectionTransitionError::NotCompleted
        | InspectionTransitionError::AlreadyVerified => Error::conflict(error.to_string()),
    }
}

impl InspectionService {
    /// Create a new service over the given adapters.
    pub fn new(
        inspections: Arc<dyn InspectionRepository>,
        audit: Arc<dyn AuditLogRepository>,
    ) -> Self {
        Self { inspections, audit }
    }

    async fn fetch(&self, id: Uuid) -> Result<Inspection, Error> {
        self.inspections
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("inspection not found"))
    }

    async fn record_audit(&self, actor: &Actor, action: AuditAction, inspection: &Inspection) {
        let draft = AuditDraft {
            user_id: Some(actor.id),
            user_email: Some(actor.email.clone()),
            user_role: Some(actor.roles.actual()),
            action,
            table_name: INSPECTIONS_TABLE.to_owned(),
            record_id: inspection.id.to_string(),
            old_values: None,
            new_values: Some(json!({
                "status": inspection.status.as_str(),
                "result": inspection.result.as_str(),
            })),
        };
        if let Err(error) = self.audit.append(&draft).await {
            warn!(%error, table = INSPECTIONS_TABLE, "audit append failed");
        }
    }

    fn state_of(inspection: &Inspection) -> InspectionState {
        InspectionState {
            status: inspection.status,
            verified: inspection.is_verified(),
        }
    }

    /// The assigned inspector may act on their own inspections; wider roles
    /// act on any.
    fn ensure_may_work_on(actor: &Actor, inspection: &Inspection) -> Result<(), Error> {
        let role = actor.effective_role();
        if !role.can_schedule_inspections() {
            return Err(Error::forbidden("role may not work on inspections"));
        }
        if role == Role::Inspector && inspection.assigned_inspector_id != Some(actor.id) {
            return Err(Error::forbidden(
                "only the assigned inspector may act on this inspection",
            ));
        }
        Ok(())
    }

    /// List inspections for display.
    pub async fn list(&self) -> Result<Vec<Inspection>, Error> {
        self.inspections.list().await.map_err(map_persistence_error)
    }

    /// List a vehicle's inspections for display.
    pub async fn list_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Inspection>, Error> {
        self.inspections
            .list_for_vehicle(vehicle_id)
            .await
            .map_err(map_persistence_error)
    }

    /// Fetch one inspection for display.
    pub async fn detail(&self, id: Uuid) -> Result<Inspection, Error> {
        self.fetch(id).await
    }

    /// Schedule a new inspection.
    pub async fn schedule(
        &self,
        actor: &Actor,
        request: ScheduleInspectionRequest,
    ) -> Result<Inspection, Error> {
        if !actor.effective_role().can_schedule_inspections() {
            return Err(Error::forbidden("role may not schedule inspections"));
        }
        let now = Utc::now();
        let inspection = Inspection {
            id: Uuid::new_v4(),
            vehicle_id: request.vehicle_id,
            inspection_type: request.inspection_type,
            assignment_id: request.assignment_id,
            assigned_inspector_id: request.assigned_inspector_id,
            assigned_by: Some(actor.id),
            scheduled_date: request.scheduled_date,
            started_at: None,
            completed_at: None,
            result: InspectionResult::Pending,
            failure_reason: FailureReason::empty(),
            notes: request.notes,
            verified_by: None,
            verified_at: None,
            status: InspectionStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        self.inspections
            .insert(&inspection)
            .await
            .map_err(map_persistence_error)?;
        self.record_audit(actor, AuditAction::Create, &inspection)
            .await;
        Ok(inspection)
    }

    /// Begin work on a scheduled inspection.
    pub async fn start(&self, actor: &Actor, id: Uuid) -> Result<Inspection, Error> {
        let mut inspection = self.fetch(id).await?;
        Self::ensure_may_work_on(actor, &inspection)?;
        let next = inspection_fsm::apply(Self::state_of(&inspection), &InspectionAction::Start)
            .map_err(map_transition_error)?;

        let repo = Arc::clone(&self.inspections);
        commit_optimistically(
            &mut inspection,
            |i| {
                i.status = next.status;
                i.started_at = Some(Utc::now());
                i.updated_at = Utc::now();
            },
            |updated| async move { repo.record_start(&updated).await },
        )
        .await
        .map_err(map_persistence_error)?;

        self.record_audit(actor, AuditAction::Update, &inspection)
            .await;
        Ok(inspection)
    }

    /// Record the result and complete the inspection.
    pub async fn submit(
        &self,
        actor: &Actor,
        id: Uuid,
        request: SubmitInspectionRequest,
    ) -> Result<Inspection, Error> {
        let mut inspection = self.fetch(id).await?;
        Self::ensure_may_work_on(actor, &inspection)?;

        let action = InspectionAction::Submit {
            result: request.result,
            failure_reason: request.failure_reason.clone(),
        };
        let next = inspection_fsm::apply(Self::state_of(&inspection), &action)
            .map_err(map_transition_error)?;

        let now = Utc::now();
        // A passing submission never carries a failure reason.
        let failure_reason = match request.result {
            InspectionResult::Fail => request.failure_reason,
            InspectionResult::Pass | InspectionResult::Pending => FailureReason::empty(),
        };
        let repo = Arc::clone(&self.inspections);
        commit_optimistically(
            &mut inspection,
            |i| {
                i.status = next.status;
                i.result = request.result;
                i.failure_reason = failure_reason;
                i.notes = request.notes.clone();
                i.completed_at = Some(now);
                i.updated_at = now;
            },
            |updated| async move { repo.record_submission(&updated).await },
        )
        .await
        .map_err(map_persistence_error)?;

        if !request.checklist.is_empty() {
            let items: Vec<ChecklistItem> = request
                .checklist
                .into_iter()
                .map(|draft| ChecklistItem {
                    id: Uuid::new_v4(),
                    inspection_id: inspection.id,
                    item_name: draft.item_name,
                    item_description: draft.item_description,
                    passed: draft.passed,
                    notes: draft.notes,
                    checked_at: Some(now),
                })
                .collect();
            self.inspections
                .append_checklist(&items)
                .await
                .map_err(map_persistence_error)?;
        }

        self.record_audit(actor, AuditAction::Submit, &inspection)
            .await;
        Ok(inspection)
    }

    /// Withdraw an open inspection. Irreversible.
    pub async fn cancel(&self, actor: &Actor, id: Uuid) -> Result<Inspection, Error> {
        if !actor.effective_role().can_cancel_inspections() {
            return Err(Error::forbidden("role may not cancel inspections"));
        }
        let mut inspection = self.fetch(id).await?;
        let next = inspection_fsm::apply(Self::state_of(&inspection), &InspectionAction::Cancel)
            .map_err(map_transition_error)?;

        let repo = Arc::clone(&self.inspections);
        commit_optimistically(
            &mut inspection,
            |i| {
                i.status = next.status;
                i.updated_at = Utc::now();
            },
            |updated| async move { repo.record_cancellation(&updated).await },
        )
        .await
        .map_err(map_persistence_error)?;

        self.record_audit(actor, AuditAction::Update, &inspection)
            .await;
        Ok(inspection)
    }

    /// Verifier sign-off. At most one call ever succeeds per inspection.
    pub async fn verify(&self, actor: &Actor, id: Uuid) -> Result<VerifyResponse, Error> {
        if !actor.effective_role().can_verify_inspections() {
            return Err(Error::forbidden("only verifiers may verify inspections"));
        }
        let mut inspection = self.fetch(id).await?;
        inspection_fsm::apply(Self::state_of(&inspection), &InspectionAction::Verify)
            .map_err(map_transition_error)?;

        let verified_at = Utc::now();
        let outcome = self
            .inspections
            .verify(id, actor.id, verified_at)
            .await
            .map_err(map_persistence_error)?;

        match outcome {
            VerifyOutcome::Verified => {
                inspection.verified_by = Some(actor.id);
                inspection.verified_at = Some(verified_at);
                self.record_audit(actor, AuditAction::Update, &inspection)
                    .await;
                Ok(VerifyResponse {
                    inspection,
                    already_verified: false,
                })
            }
            VerifyOutcome::AlreadyVerified => {
                // Lost the race: hand back fresh state rather than an error.
                let refreshed = self.fetch(id).await?;
                Ok(VerifyResponse {
                    inspection: refreshed,
                    already_verified: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockAuditLogRepository, MockInspectionRepository};
    use crate::domain::pov::RoleContext;
    use crate::domain::ErrorCode;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            email: "actor@example.com".to_owned(),
            roles: RoleContext::new(role, None),
        }
    }

    fn inspection(status: InspectionStatus, inspector: Option<Uuid>) -> Inspection {
        let now = Utc::now();
        Inspection {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            inspection_type: InspectionType::Routine,
            assignment_id: None,
            assigned_inspector_id: inspector,
            assigned_by: None,
            scheduled_date: now,
            started_at: None,
            completed_at: None,
            result: InspectionResult::Pending,
            failure_reason: FailureReason::empty(),
            notes: None,
            verified_by: None,
            verified_at: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn quiet_audit() -> MockAuditLogRepository {
        let mut audit = MockAuditLogRepository::new();
        audit.expect_append().returning(|_| Ok(()));
        audit
    }

    fn fail_request(tags: &[&str]) -> SubmitInspectionRequest {
        SubmitInspectionRequest {
            result: InspectionResult::Fail,
            failure_reason: FailureReason::new(
                tags.iter().map(|t| (*t).to_owned()).collect(),
                None,
            ),
            notes: None,
            checklist: Vec::new(),
        }
    }

    #[tokio::test]
    async fn submission_without_reason_is_rejected_before_any_write() {
        let actor = actor(Role::Inspector);
        let existing = inspection(InspectionStatus::InProgress, Some(actor.id));
        let id = existing.id;
        let mut repo = MockInspectionRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_record_submission().times(0);

        let service = InspectionService::new(Arc::new(repo), Arc::new(MockAuditLogRepository::new()));
        let error = service
            .submit(&actor, id, fail_request(&[]))
            .await
            .expect_err("missing reason");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn submission_completes_and_appends_checklist() {
        let actor = actor(Role::Inspector);
        let existing = inspection(InspectionStatus::Scheduled, Some(actor.id));
        let id = existing.id;
        let mut repo = MockInspectionRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_record_submission()
            .withf(|updated: &Inspection| {
                updated.status == InspectionStatus::Completed
                    && updated.result == InspectionResult::Fail
                    && updated.completed_at.is_some()
            })
            .times(1)
            .return_once(|_| Ok(()));
        repo.expect_append_checklist()
            .withf(|items: &[ChecklistItem]| items.len() == 1 && items[0].passed == Some(false))
            .times(1)
            .return_once(|_| Ok(()));

        let mut request = fail_request(&["Brakes"]);
        request.checklist.push(ChecklistDraft {
            item_name: "Brakes".to_owned(),
            item_description: None,
            passed: Some(false),
            notes: Some("pads worn".to_owned()),
        });

        let service = InspectionService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let submitted = service
            .submit(&actor, id, request)
            .await
            .expect("submission succeeds");
        assert_eq!(submitted.status, InspectionStatus::Completed);
        assert!(!submitted.failure_reason.is_empty());
    }

    #[tokio::test]
    async fn inspectors_may_only_submit_their_own_inspections() {
        let actor = actor(Role::Inspector);
        let existing = inspection(InspectionStatus::Scheduled, Some(Uuid::new_v4()));
        let id = existing.id;
        let mut repo = MockInspectionRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));

        let service = InspectionService::new(Arc::new(repo), Arc::new(MockAuditLogRepository::new()));
        let error = service
            .submit(&actor, id, fail_request(&["Brakes"]))
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn verify_happy_path_records_sign_off() {
        let actor = actor(Role::Verifier);
        let mut existing = inspection(InspectionStatus::Completed, None);
        existing.result = InspectionResult::Pass;
        let id = existing.id;
        let mut repo = MockInspectionRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));
        repo.expect_verify().times(1).return_once(|_, _, _| Ok(VerifyOutcome::Verified));

        let service = InspectionService::new(Arc::new(repo), Arc::new(quiet_audit()));
        let response = service.verify(&actor, id).await.expect("verify succeeds");
        assert!(!response.already_verified);
        assert!(response.inspection.is_verified());
    }

    #[tokio::test]
    async fn losing_the_verify_race_refreshes_instead_of_failing() {
        let actor = actor(Role::Verifier);
        let other_verifier = Uuid::new_v4();
        let mut existing = inspection(InspectionStatus::Completed, None);
        existing.result = InspectionResult::Pass;
        let id = existing.id;
        let mut already = existing.clone();
        already.verified_by = Some(other_verifier);
        already.verified_at = Some(Utc::now());

        let mut repo = MockInspectionRepository::new();
        let mut fetches = vec![Ok(Some(already)), Ok(Some(existing))];
        repo.expect_find_by_id()
            .times(2)
            .returning(move |_| fetches.pop().unwrap_or_else(|| Ok(None)));
        repo.expect_verify()
            .times(1)
            .return_once(|_, _, _| Ok(VerifyOutcome::AlreadyVerified));

        let service = InspectionService::new(Arc::new(repo), Arc::new(MockAuditLogRepository::new()));
        let response = service.verify(&actor, id).await.expect("refresh succeeds");
        assert!(response.already_verified);
        assert_eq!(response.inspection.verified_by, Some(other_verifier));
    }

    #[tokio::test]
    async fn only_verifiers_may_verify() {
        let repo = MockInspectionRepository::new();
        let service = InspectionService::new(Arc::new(repo), Arc::new(MockAuditLogRepository::new()));
        let error = service
            .verify(&actor(Role::Admin), Uuid::new_v4())
            .await
            .expect_err("forbidden");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn cancelled_inspections_reject_submission() {
        let actor = actor(Role::Owner);
        let existing = inspection(InspectionStatus::Cancelled, None);
        let id = existing.id;
        let mut repo = MockInspectionRepository::new();
        repo.expect_find_by_id()
            .return_once(move |_| Ok(Some(existing)));

        let service = InspectionService::new(Arc::new(repo), Arc::new(MockAuditLogRepository::new()));
        let error = service
            .submit(&actor, id, fail_request(&["Brakes"]))
            .await
            .expect_err("conflict");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }
}
