//! Domain primitives, policies, and services.
//!
//! Purpose: hold the two policies every view depends on, away from any
//! transport or storage detail:
//!
//! - the visibility policy (roles, effective-role resolution, masking), and
//! - the lifecycle policy (one state machine per entity under
//!   [`lifecycle`]).
//!
//! Entities are plain serialisable structs with their invariants enforced at
//! construction; services drive mutations through role gate, state machine,
//! optimistic commit, and audit append, in that order.

pub mod assignment;
pub mod assignment_service;
pub mod audit;
pub mod audit_service;
pub mod company;
pub mod error;
pub mod failure_reason;
pub mod fleet_service;
pub mod inspection;
pub mod inspection_service;
pub mod lifecycle;
pub mod masking;
pub mod optimistic;
pub mod ports;
pub mod pov;
pub mod role;
pub mod sanitize;
pub mod user;
pub mod user_service;
pub mod vehicle;

pub use self::assignment::{Assignment, AssignmentStatus};
pub use self::assignment_service::{
    AssignmentInspectionRequest, AssignmentService, CreateAssignmentRequest,
    EditAssignmentRequest,
};
pub use self::audit::{
    redact_audit_values, AuditAction, AuditDraft, AuditEntry, SENSITIVE_AUDIT_FIELDS,
};
pub use self::audit_service::AuditService;
pub use self::company::{Company, EquipmentCategory, EquipmentType};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::failure_reason::{
    FailureReason, FailureReasonEntry, CANONICAL_FAILURE_REASONS,
};
pub use self::fleet_service::FleetService;
pub use self::inspection::{
    ChecklistItem, Inspection, InspectionResult, InspectionStatus, InspectionType,
};
pub use self::inspection_service::{
    ChecklistDraft, InspectionService, ScheduleInspectionRequest, SubmitInspectionRequest,
    VerifyResponse,
};
pub use self::masking::{
    mask_id, mask_name, mask_national_id, mask_plate_number, EMPTY_PLACEHOLDER,
};
pub use self::optimistic::commit_optimistically;
pub use self::pov::{Actor, RoleContext, ViewAsError};
pub use self::role::{ParseRoleError, Role, ALL_ROLES};
pub use self::sanitize::{sanitize_field, sanitize_text};
pub use self::user::{UserProfile, UserProfileDraft, UserValidationError};
pub use self::user_service::{ProvisionUserRequest, UserService};
pub use self::vehicle::{PlateNumber, PlateValidationError, Vehicle, VehicleStatus};

/// Convenient result alias for fallible domain operations.
pub type DomainResult<T> = Result<T, Error>;
