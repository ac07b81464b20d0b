//! End-to-end lifecycle scenarios at the service layer, over in-memory
//! adapters.

mod support;

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use fleetgate::domain::{
    Assignment, AssignmentService, AssignmentStatus, AuditAction, EditAssignmentRequest,
    FailureReason, FleetService, InspectionResult, InspectionService, PlateNumber, Role,
    SubmitInspectionRequest, Vehicle, VehicleStatus,
};
use support::{actor, InMemoryAssignments, InMemoryInspections, InMemoryVehicles, RecordingAudit};

fn vehicle(status: VehicleStatus) -> Vehicle {
    let now = Utc::now();
    Vehicle {
        id: Uuid::new_v4(),
        plate_number: PlateNumber::new("GATE7712").expect("valid plate"),
        driver_name: Some("John Smith".to_owned()),
        national_id: Some("1029384756".to_owned()),
        company_id: None,
        equipment_type_id: None,
        year_of_manufacture: None,
        project: None,
        gate: None,
        status,
        next_inspection_date: None,
        blacklisted: false,
        created_by: None,
        created_at: now,
        updated_at: now,
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

#[tokio::test]
async fn blacklist_then_unblacklist_round_trip() {
    let rejected = vehicle(VehicleStatus::Rejected);
    let id = rejected.id;
    let store = Arc::new(InMemoryVehicles::with(rejected));
    let audit = Arc::new(RecordingAudit::default());
    let service = FleetService::new(store.clone(), audit.clone());
    let admin = actor(Role::Admin);

    let blacklisted = service
        .blacklist(&admin, id)
        .await
        .expect("blacklist succeeds");
    assert_eq!(blacklisted.status, VehicleStatus::Blacklisted);
    assert!(blacklisted.blacklisted);
    // The store agrees with the returned copy.
    let stored = store.get(id).expect("vehicle present");
    assert_eq!(stored.status, VehicleStatus::Blacklisted);
    assert!(stored.blacklisted);

    let restored = service
        .unblacklist(&admin, id, None)
        .await
        .expect("un-blacklist succeeds");
    assert_eq!(restored.status, VehicleStatus::UpdatedInspectionRequired);
    assert!(!restored.blacklisted);

    // Both transitions left an audit trail.
    let drafts = audit.drafts();
    assert_eq!(drafts.len(), 2);
    assert!(drafts.iter().all(|d| d.action == AuditAction::Update));
    assert!(drafts.iter().all(|d| d.table_name == "vehicle_equipment"));
}

#[tokio::test]
async fn assignment_date_edit_reschedules_and_other_edits_do_not() {
    let booked = assignment(AssignmentStatus::Assigned);
    let id = booked.id;
    let company_id = booked.company_id;
    let original_date = booked.scheduled_date;
    let store = Arc::new(InMemoryAssignments::with(booked));
    let service = AssignmentService::new(
        store.clone(),
        Arc::new(InMemoryInspections::default()),
        Arc::new(RecordingAudit::default()),
    );
    let admin = actor(Role::Admin);

    // A notes-only edit keeps the original status.
    let unchanged = service
        .edit(
            &admin,
            id,
            EditAssignmentRequest {
                company_id,
                inspector_id: None,
                scheduled_date: original_date,
                notes: Some("bring lifting tackle".to_owned()),
            },
        )
        .await
        .expect("edit succeeds");
    assert_eq!(unchanged.status, AssignmentStatus::Assigned);

    // Moving the date flips the booking to rescheduled.
    let moved = service
        .edit(
            &admin,
            id,
            EditAssignmentRequest {
                company_id,
                inspector_id: None,
                scheduled_date: original_date + Duration::days(3),
                notes: None,
            },
        )
        .await
        .expect("edit succeeds");
    assert_eq!(moved.status, AssignmentStatus::Rescheduled);
    assert_eq!(
        store.get(id).expect("assignment present").status,
        AssignmentStatus::Rescheduled
    );
}

#[tokio::test]
async fn done_assignment_is_frozen() {
    let done = assignment(AssignmentStatus::Done);
    let id = done.id;
    let company_id = done.company_id;
    let date = done.scheduled_date;
    let store = Arc::new(InMemoryAssignments::with(done));
    let service = AssignmentService::new(
        store,
        Arc::new(InMemoryInspections::default()),
        Arc::new(RecordingAudit::default()),
    );

    let error = service
        .edit(
            &actor(Role::Owner),
            id,
            EditAssignmentRequest {
                company_id,
                inspector_id: None,
                scheduled_date: date + Duration::days(1),
                notes: None,
            },
        )
        .await
        .expect_err("done assignments refuse edits");
    assert_eq!(error.code(), fleetgate::domain::ErrorCode::Conflict);
}

#[tokio::test]
async fn failed_submission_reaches_storage_with_its_reason() {
    let inspector = actor(Role::Inspector);
    let now = Utc::now();
    let inspection = fleetgate::domain::Inspection {
        id: Uuid::new_v4(),
        vehicle_id: Uuid::new_v4(),
        inspection_type: fleetgate::domain::InspectionType::Routine,
        assignment_id: None,
        assigned_inspector_id: Some(inspector.id),
        assigned_by: None,
        scheduled_date: now,
        started_at: None,
        completed_at: None,
        result: InspectionResult::Pending,
        failure_reason: FailureReason::empty(),
        notes: None,
        verified_by: None,
        verified_at: None,
        status: fleetgate::domain::InspectionStatus::Scheduled,
        created_at: now,
        updated_at: now,
    };
    let id = inspection.id;
    let store = Arc::new(InMemoryInspections::with(inspection));
    let service = InspectionService::new(store.clone(), Arc::new(RecordingAudit::default()));

    let submitted = service
        .submit(
            &inspector,
            id,
            SubmitInspectionRequest {
                result: InspectionResult::Fail,
                failure_reason: FailureReason::new(
                    vec!["Brakes".to_owned(), "Oil Leak".to_owned()],
                    Some("cracked mirror".to_owned()),
                ),
                notes: None,
                checklist: Vec::new(),
            },
        )
        .await
        .expect("submission succeeds");

    assert_eq!(
        submitted.status,
        fleetgate::domain::InspectionStatus::Completed
    );
    // A completed failure always carries its reason.
    let stored = store.get(id).expect("inspection present");
    assert_eq!(stored.result, InspectionResult::Fail);
    assert!(!stored.failure_reason.is_empty());
    assert_eq!(
        stored.failure_reason.to_legacy_string().as_deref(),
        Some("Brakes, Oil Leak, Other: cracked mirror")
    );
}
