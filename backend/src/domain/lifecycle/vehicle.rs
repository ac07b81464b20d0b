//! Vehicle status state machine.
//!
//! The blacklist flag and the stored status move together: blacklisting sets
//! both, un-blacklisting clears the flag and picks a fresh status. Direct
//! status selection is only available while the vehicle is off the blacklist.
//! There are no terminal states; every status is re-enterable.

use crate::domain::role::Role;
use crate::domain::vehicle::VehicleStatus;

/// Requested change to a vehicle's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleAction {
    /// Select a status directly from the non-blacklisted set.
    SetStatus(VehicleStatus),
    /// Bar the vehicle from operation.
    Blacklist,
    /// Return the vehicle to normal operation. Without an explicit target the
    /// vehicle lands on `UpdatedInspectionRequired`, forcing a fresh
    /// inspection before it can be verified again.
    Unblacklist { target: Option<VehicleStatus> },
}

/// The pair of columns the machine governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleState {
    pub status: VehicleStatus,
    pub blacklisted: bool,
}

/// Rejected vehicle transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VehicleTransitionError {
    /// Direct status selection while the blacklist override is active.
    #[error("vehicle is blacklisted; remove it from the blacklist first")]
    Blacklisted,
    /// Un-blacklisting a vehicle that is not blacklisted.
    #[error("vehicle is not blacklisted")]
    NotBlacklisted,
    /// Un-blacklisting straight back onto the blacklist.
    #[error("cannot un-blacklist a vehicle onto the blacklist")]
    UnblacklistToBlacklisted,
}

/// Whether `role` may trigger `action` from `current`.
pub fn can_transition(current: VehicleState, action: &VehicleAction, role: Role) -> bool {
    let role_allows = match action {
        // Selecting the blacklisted status is the blacklist action in
        // disguise and keeps its narrower role set.
        VehicleAction::SetStatus(VehicleStatus::Blacklisted) => role.can_manage_fleet(),
        VehicleAction::SetStatus(_) => role.can_set_vehicle_status(),
        VehicleAction::Blacklist | VehicleAction::Unblacklist { .. } => role.can_manage_fleet(),
    };
    role_allows && apply(current, action).is_ok()
}

/// Compute the next state, rejecting unlisted transitions.
pub fn apply(
    current: VehicleState,
    action: &VehicleAction,
) -> Result<VehicleState, VehicleTransitionError> {
    match action {
        VehicleAction::Blacklist | VehicleAction::SetStatus(VehicleStatus::Blacklisted) => {
            Ok(VehicleState {
                status: VehicleStatus::Blacklisted,
                blacklisted: true,
            })
        }
        VehicleAction::Unblacklist { target } => {
            if !current.blacklisted {
                return Err(VehicleTransitionError::NotBlacklisted);
            }
            let status = target.unwrap_or(VehicleStatus::UpdatedInspectionRequired);
            if status == VehicleStatus::Blacklisted {
                return Err(VehicleTransitionError::UnblacklistToBlacklisted);
            }
            Ok(VehicleState {
                status,
                blacklisted: false,
            })
        }
        VehicleAction::SetStatus(target) => {
            if current.blacklisted {
                return Err(VehicleTransitionError::Blacklisted);
            }
            Ok(VehicleState {
                status: *target,
                blacklisted: false,
            })
        }
    }
}
