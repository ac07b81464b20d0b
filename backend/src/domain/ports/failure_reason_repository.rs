//! Port abstraction for the administrator-maintained failure reason list.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::failure_reason::FailureReasonEntry;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by failure-reason repository adapters.
    pub enum FailureReasonPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "failure reason repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "failure reason repository query failed: {message}",
        /// Reason names are unique; this one already exists.
        DuplicateName { name: String } => "failure reason {name} already exists",
    }
}

/// Persistence port for canonical failure reasons.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FailureReasonRepository: Send + Sync {
    /// List active reasons in display order.
    async fn list_active(&self) -> Result<Vec<FailureReasonEntry>, FailureReasonPersistenceError>;

    /// Insert a new reason.
    async fn insert(
        &self,
        entry: &FailureReasonEntry,
    ) -> Result<(), FailureReasonPersistenceError>;

    /// Write the active flag for one reason.
    async fn set_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<(), FailureReasonPersistenceError>;
}
