//! Assignment lifecycle state machine.
//!
//! `Done` is terminal. `Rescheduled` is never requested directly; it is the
//! side effect of moving the scheduled date of an assignment that is still in
//! its original `Assigned` state, so [`status_after_edit`] is the entry point
//! used by the edit path.

use crate::domain::assignment::AssignmentStatus;
use crate::domain::role::Role;

/// Requested change to an assignment's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentAction {
    /// Mark the booking fulfilled. Terminal.
    MarkDone,
    /// Flag the booking as slipped.
    MarkDelayed,
}

/// Rejected assignment transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentTransitionError {
    /// Nothing changes once an assignment is done.
    #[error("assignment is done and can no longer change")]
    Done,
    /// Delaying an already delayed assignment.
    #[error("assignment is already delayed")]
    AlreadyDelayed,
}

/// Whether `role` may trigger `action` from `current`.
pub fn can_transition(current: AssignmentStatus, action: &AssignmentAction, role: Role) -> bool {
    role.can_manage_assignments() && apply(current, action).is_ok()
}

/// Compute the next status, rejecting unlisted transitions.
pub fn apply(
    current: AssignmentStatus,
    action: &AssignmentAction,
) -> Result<AssignmentStatus, AssignmentTransitionError> {
    if current == AssignmentStatus::Done {
        return Err(AssignmentTransitionError::Done);
    }
    match action {
        AssignmentAction::MarkDone => Ok(AssignmentStatus::Done),
        AssignmentAction::MarkDelayed => {
            if current == AssignmentStatus::Delayed {
                return Err(AssignmentTransitionError::AlreadyDelayed);
            }
            Ok(AssignmentStatus::Delayed)
        }
    }
}

/// Status the assignment holds after an edit.
///
/// Moving the date of an assignment that is still `Assigned` turns it
/// `Rescheduled`; any other edit leaves the status alone. Edits to a done
/// assignment are refused outright.
pub fn status_after_edit(
    current: AssignmentStatus,
    date_changed: bool,
) -> Result<AssignmentStatus, AssignmentTransitionError> {
    if current == AssignmentStatus::Done {
        return Err(AssignmentTransitionError::Done);
    }
    if date_changed && current == AssignmentStatus::Assigned {
        return Ok(AssignmentStatus::Rescheduled);
    }
    Ok(current)
}

/// Whether an inspection may be spawned from an assignment in this status.
///
/// A side-channel action rather than a transition: it leaves the assignment
/// untouched and only requires that the booking is not already fulfilled.
pub fn can_create_inspection(current: AssignmentStatus) -> bool {
    current != AssignmentStatus::Done
}
