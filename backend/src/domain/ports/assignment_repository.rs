//! Port abstraction for assignment persistence adapters and their errors.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::assignment::{Assignment, AssignmentStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by assignment repository adapters.
    pub enum AssignmentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "assignment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "assignment repository query failed: {message}",
    }
}

/// Persistence port for assignments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Fetch an assignment by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>, AssignmentPersistenceError>;

    /// List assignments, soonest first.
    async fn list(&self) -> Result<Vec<Assignment>, AssignmentPersistenceError>;

    /// Insert a new assignment.
    async fn insert(&self, assignment: &Assignment) -> Result<(), AssignmentPersistenceError>;

    /// Update an assignment's editable fields, including any status change
    /// implied by the edit.
    async fn update(&self, assignment: &Assignment) -> Result<(), AssignmentPersistenceError>;

    /// Write the status column for one assignment.
    async fn set_status(
        &self,
        id: Uuid,
        status: AssignmentStatus,
    ) -> Result<(), AssignmentPersistenceError>;
}
