//! Effective-role resolution and the owner's view-as override.
//!
//! Owners can preview the application as any other role without changing
//! their session. The override is carried in the session cookie and rebuilt
//! into a [`RoleContext`] once per request; handlers and services only ever
//! consult the context, never ambient state.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::Role;

/// Errors raised when manipulating the view-as override.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewAsError {
    /// Only owners may preview other roles.
    #[error("only owners may set a view-as override")]
    NotOwner,
}

/// The viewer's role context for a single request.
///
/// ## Invariants
/// - `view_as` is only ever `Some` for owners; constructors scrub overrides
///   carried by any other role so a stale cookie cannot escalate or confuse.
/// - An `Owner` override is meaningless and normalised to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleContext {
    actual: Role,
    view_as: Option<Role>,
}

impl RoleContext {
    /// Build a context from the authenticated role and a persisted override.
    ///
    /// Overrides held by non-owners, and the redundant `Owner` override, are
    /// dropped rather than rejected: the persisted value may simply be stale.
    pub fn new(actual: Role, view_as: Option<Role>) -> Self {
        let view_as = match (actual, view_as) {
            (Role::Owner, Some(role)) if role != Role::Owner => Some(role),
            _ => None,
        };
        Self { actual, view_as }
    }

    /// The authenticated role, regardless of any preview.
    pub fn actual(&self) -> Role {
        self.actual
    }

    /// The active override, if any.
    pub fn view_as(&self) -> Option<Role> {
        self.view_as
    }

    /// The role used for every visibility and permission decision.
    ///
    /// # Examples
    /// ```
    /// use fleetgate::domain::{Role, RoleContext};
    ///
    /// let ctx = RoleContext::new(Role::Owner, Some(Role::Contractor));
    /// assert_eq!(ctx.effective(), Role::Contractor);
    ///
    /// let ctx = RoleContext::new(Role::Admin, Some(Role::Contractor));
    /// assert_eq!(ctx.effective(), Role::Admin);
    /// ```
    pub fn effective(&self) -> Role {
        self.view_as.unwrap_or(self.actual)
    }

    /// Whether an owner is currently previewing another role.
    pub fn is_previewing(&self) -> bool {
        self.view_as.is_some()
    }

    /// Set or clear the override, returning the value to persist.
    ///
    /// `Some(Role::Owner)` clears the override, mirroring how selecting the
    /// real role dismisses a preview. Returns the new persisted value
    /// (`None` means the stored override should be removed).
    pub fn set_view_as(&mut self, role: Option<Role>) -> Result<Option<Role>, ViewAsError> {
        if self.actual != Role::Owner {
            return Err(ViewAsError::NotOwner);
        }
        self.view_as = role.filter(|r| *r != Role::Owner);
        Ok(self.view_as)
    }
}

/// The authenticated subject driving a request.
///
/// Permission checks use the effective role so an owner previewing another
/// role is held to that role's limits; the audit trail records the actual
/// role alongside the identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: uuid::Uuid,
    pub email: String,
    pub roles: RoleContext,
}

impl Actor {
    /// Role used for permission and visibility decisions.
    pub fn effective_role(&self) -> Role {
        self.roles.effective()
    }
}
