//! Port abstraction for user-profile persistence adapters and their errors.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::role::Role;
use crate::domain::user::UserProfile;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another profile already uses this e-mail address.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

/// Persistence port for user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a profile by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, UserPersistenceError>;

    /// List profiles, newest first.
    async fn list(&self) -> Result<Vec<UserProfile>, UserPersistenceError>;

    /// Insert a freshly provisioned profile.
    async fn insert(&self, profile: &UserProfile) -> Result<(), UserPersistenceError>;

    /// Write the active flag for one profile.
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<(), UserPersistenceError>;

    /// Write the role column for one profile.
    async fn set_role(&self, id: Uuid, role: Role) -> Result<(), UserPersistenceError>;
}
