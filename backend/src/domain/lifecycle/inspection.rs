//! Inspection lifecycle state machine.
//!
//! `Completed` and `Cancelled` are terminal for status purposes; the only
//! operation allowed afterwards is the one-time verification of a completed
//! inspection. The machine validates submissions (a result must be decisive,
//! and a failure must say why) so an invalid submission never reaches the
//! store.

use crate::domain::failure_reason::FailureReason;
use crate::domain::inspection::{InspectionResult, InspectionStatus};
use crate::domain::role::Role;

/// Requested change to an inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum InspectionAction {
    /// Begin work on a scheduled inspection.
    Start,
    /// Record the outcome and complete the inspection.
    Submit {
        result: InspectionResult,
        failure_reason: FailureReason,
    },
    /// Withdraw the inspection. Irreversible.
    Cancel,
    /// Verifier sign-off on a completed inspection. At most once.
    Verify,
}

/// The columns the machine governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectionState {
    pub status: InspectionStatus,
    pub verified: bool,
}

/// Rejected inspection transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InspectionTransitionError {
    /// The inspection is no longer open for this action.
    #[error("inspection is {status} and cannot accept this action")]
    Closed { status: InspectionStatus },
    /// Submissions must decide pass or fail.
    #[error("a submission must record a pass or fail result")]
    IndecisiveResult,
    /// A failed inspection must say why.
    #[error("a failed inspection requires at least one failure reason")]
    MissingFailureReason,
    /// Verification only applies to completed inspections.
    #[error("only completed inspections can be verified")]
    NotCompleted,
    /// Verification already happened.
    #[error("inspection is already verified")]
    AlreadyVerified,
}

/// Whether `role` may trigger `action` from `current`.
///
/// Submission is additionally restricted to the assigned inspector when the
/// actor holds the inspector role; that identity check needs the actor's id
/// and lives with the caller. The machine gates on role class and state.
pub fn can_transition(current: InspectionState, action: &InspectionAction, role: Role) -> bool {
    let role_allows = match action {
        InspectionAction::Start | InspectionAction::Submit { .. } => {
            role.can_schedule_inspections()
        }
        InspectionAction::Cancel => role.can_cancel_inspections(),
        InspectionAction::Verify => role.can_verify_inspections(),
    };
    role_allows && apply(current, action).is_ok()
}

/// Compute the next state, rejecting unlisted transitions.
pub fn apply(
    current: InspectionState,
    action: &InspectionAction,
) -> Result<InspectionState, InspectionTransitionError> {
    match action {
        InspectionAction::Start => match current.status {
            InspectionStatus::Scheduled => Ok(InspectionState {
                status: InspectionStatus::InProgress,
                verified: false,
            }),
            status => Err(InspectionTransitionError::Closed { status }),
        },
        InspectionAction::Submit {
            result,
            failure_reason,
        } => {
            match current.status {
                InspectionStatus::Scheduled | InspectionStatus::InProgress => {}
                status => return Err(InspectionTransitionError::Closed { status }),
            }
            match result {
                InspectionResult::Pending => {
                    return Err(InspectionTransitionError::IndecisiveResult)
                }
                InspectionResult::Fail if failure_reason.is_empty() => {
                    return Err(InspectionTransitionError::MissingFailureReason)
                }
                InspectionResult::Pass | InspectionResult::Fail => {}
            }
            Ok(InspectionState {
                status: InspectionStatus::Completed,
                verified: false,
            })
        }
        InspectionAction::Cancel => match current.status {
            InspectionStatus::Scheduled | InspectionStatus::InProgress => Ok(InspectionState {
                status: InspectionStatus::Cancelled,
                verified: false,
            }),
            status => Err(InspectionTransitionError::Closed { status }),
        },
        InspectionAction::Verify => {
            if current.status != InspectionStatus::Completed {
                return Err(InspectionTransitionError::NotCompleted);
            }
            if current.verified {
                return Err(InspectionTransitionError::AlreadyVerified);
            }
            Ok(InspectionState {
                status: InspectionStatus::Completed,
                verified: true,
            })
        }
    }
}
