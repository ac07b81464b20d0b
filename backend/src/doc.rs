//! OpenAPI document assembled from handler annotations.

use utoipa::OpenApi;

use crate::domain;
use crate::inbound::http;

/// Public OpenAPI surface used by Swagger UI and tooling.
#[derive(OpenApi)]
#[openapi(
    paths(
        http::pov::role_context,
        http::pov::set_view_as,
        http::pov::clear_view_as,
        http::vehicles::list_vehicles,
        http::vehicles::vehicle_detail,
        http::vehicles::create_vehicle,
        http::vehicles::update_vehicle,
        http::vehicles::set_vehicle_status,
        http::vehicles::blacklist_vehicle,
        http::vehicles::unblacklist_vehicle,
        http::inspections::list_inspections,
        http::inspections::list_vehicle_inspections,
        http::inspections::inspection_detail,
        http::inspections::create_inspection,
        http::inspections::start_inspection,
        http::inspections::submit_inspection,
        http::inspections::cancel_inspection,
        http::inspections::verify_inspection,
        http::assignments::list_assignments,
        http::assignments::create_assignment,
        http::assignments::edit_assignment,
        http::assignments::set_assignment_status,
        http::assignments::create_assignment_inspection,
        http::users::list_users,
        http::users::create_user,
        http::users::update_user,
        http::catalogue::list_companies,
        http::catalogue::list_equipment_types,
        http::catalogue::list_failure_reasons,
        http::catalogue::create_failure_reason,
        http::catalogue::update_failure_reason,
        http::audit_logs::list_audit_logs,
    ),
    components(schemas(
        domain::Error,
        domain::ErrorCode,
        domain::Role,
        domain::RoleContext,
        domain::VehicleStatus,
        domain::Inspection,
        domain::InspectionStatus,
        domain::InspectionResult,
        domain::InspectionType,
        domain::FailureReason,
        domain::Assignment,
        domain::AssignmentStatus,
        domain::UserProfile,
        domain::AuditEntry,
        domain::Company,
        domain::EquipmentType,
        domain::EquipmentCategory,
        domain::FailureReasonEntry,
        http::vehicles::VehicleView,
        http::vehicles::CreateVehicleRequest,
        http::vehicles::SetStatusRequest,
        http::inspections::CreateInspectionRequest,
        http::inspections::SubmitRequest,
        http::inspections::ChecklistItemRequest,
        http::inspections::VerifyResponseBody,
        http::assignments::AssignmentRequest,
        http::assignments::AssignmentStatusRequest,
        http::assignments::AssignmentStatusTarget,
        http::assignments::SpawnInspectionRequest,
        http::users::CreateUserRequest,
        http::users::UpdateUserRequest,
        http::pov::ViewAsRequest,
        http::catalogue::CreateFailureReasonRequest,
        http::catalogue::UpdateFailureReasonRequest,
    )),
    tags(
        (name = "session", description = "Role context and owner preview"),
        (name = "vehicles", description = "Fleet registry and status transitions"),
        (name = "inspections", description = "Inspection lifecycle"),
        (name = "assignments", description = "Company inspection bookings"),
        (name = "users", description = "Account administration"),
        (name = "audit", description = "Append-only audit trail"),
    )
)]
pub struct ApiDoc;
