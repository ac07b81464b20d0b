//! Role classification and permission helpers.
//!
//! Every visibility and permission decision in the application keys off the
//! viewer's effective role (see [`crate::domain::pov`]). The helpers here are
//! the single source of truth for which roles see raw data, which roles lose
//! whole columns, and which roles may trigger which actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Application role.
///
/// Roles are ordered by breadth of access only informally; no role inherits
/// from another. Permission checks always name roles explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, unmasked data, and the view-as override.
    Owner,
    /// Operational management: fleet, users, assignments.
    Admin,
    /// Performs inspections and may adjust vehicle status.
    Inspector,
    /// Company-scoped external party; minimal data visibility.
    Contractor,
    /// Reviews completed inspections; minimal data visibility.
    Verifier,
}

/// All roles, in a stable order. Useful for exhaustive checks and fixtures.
pub const ALL_ROLES: [Role; 5] = [
    Role::Owner,
    Role::Admin,
    Role::Inspector,
    Role::Contractor,
    Role::Verifier,
];

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {value}")]
pub struct ParseRoleError {
    /// The rejected input.
    pub value: String,
}

impl Role {
    /// Stable storage/wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Inspector => "inspector",
            Self::Contractor => "contractor",
            Self::Verifier => "verifier",
        }
    }

    /// Whether this role sees sensitive fields unmasked.
    ///
    /// Only the owner sees raw values; every other role receives masked
    /// output from the functions in [`crate::domain::masking`].
    pub fn is_unmasked(self) -> bool {
        matches!(self, Self::Owner)
    }

    /// Whether this role has entire sensitive columns suppressed.
    ///
    /// Contractors and verifiers do not see driver names or national ids at
    /// all; views drop those columns rather than masking them.
    pub fn is_minimal_data(self) -> bool {
        matches!(self, Self::Contractor | Self::Verifier)
    }

    /// Whether this role may edit vehicles and toggle the blacklist.
    pub fn can_manage_fleet(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Whether this role may select a vehicle status directly.
    pub fn can_set_vehicle_status(self) -> bool {
        matches!(self, Self::Owner | Self::Admin | Self::Inspector)
    }

    /// Whether this role may create or schedule inspections.
    pub fn can_schedule_inspections(self) -> bool {
        matches!(self, Self::Owner | Self::Admin | Self::Inspector)
    }

    /// Whether this role may cancel a scheduled inspection.
    pub fn can_cancel_inspections(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Whether this role may verify a completed inspection.
    pub fn can_verify_inspections(self) -> bool {
        matches!(self, Self::Verifier)
    }

    /// Whether this role may change assignment status or dates.
    pub fn can_manage_assignments(self) -> bool {
        matches!(self, Self::Owner | Self::Admin | Self::Inspector)
    }

    /// Whether this role may provision new users at all.
    pub fn can_provision_users(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Whether this role may provision a user with the given role.
    ///
    /// Admins may not create owners or other admins; only an owner may.
    pub fn can_provision_role(self, target: Role) -> bool {
        match self {
            Self::Owner => true,
            Self::Admin => !matches!(target, Self::Owner | Self::Admin),
            _ => false,
        }
    }

    /// Whether this role may change another user's role.
    pub fn can_change_roles(self) -> bool {
        matches!(self, Self::Owner)
    }

    /// Whether this role may read the audit log.
    pub fn can_read_audit_log(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Whether this role may maintain the canonical failure reason list.
    pub fn can_manage_failure_reasons(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "inspector" => Ok(Self::Inspector),
            "contractor" => Ok(Self::Contractor),
            "verifier" => Ok(Self::Verifier),
            other => Err(ParseRoleError {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[test]
    fn only_owner_is_unmasked() {
        for role in ALL_ROLES {
            assert_eq!(role.is_unmasked(), role == Role::Owner);
        }
    }

    #[test]
    fn minimal_data_roles_are_exactly_contractor_and_verifier() {
        for role in ALL_ROLES {
            let expected = matches!(role, Role::Contractor | Role::Verifier);
            assert_eq!(role.is_minimal_data(), expected, "role {role}");
        }
    }

    #[rstest]
    #[case(Role::Owner, Role::Owner, true)]
    #[case(Role::Owner, Role::Admin, true)]
    #[case(Role::Admin, Role::Owner, false)]
    #[case(Role::Admin, Role::Admin, false)]
    #[case(Role::Admin, Role::Inspector, true)]
    #[case(Role::Admin, Role::Contractor, true)]
    #[case(Role::Inspector, Role::Verifier, false)]
    fn provisioning_rules(#[case] actor: Role, #[case] target: Role, #[case] allowed: bool) {
        assert_eq!(actor.can_provision_role(target), allowed);
    }

    #[test]
    fn role_strings_round_trip() {
        for role in ALL_ROLES {
            let parsed: Role = role.as_str().parse().expect("parse role");
            assert_eq!(parsed, role);
        }
        assert!("supervisor".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::Inspector).expect("serialise");
        assert_eq!(json, "\"inspector\"");
    }
}
