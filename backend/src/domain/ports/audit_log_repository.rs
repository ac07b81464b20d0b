//! Port abstraction for the append-only audit trail.
use async_trait::async_trait;

use crate::domain::audit::{AuditDraft, AuditEntry};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by audit log adapters.
    pub enum AuditPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "audit log connection failed: {message}",
        /// Append or query failed during execution.
        Query { message: String } => "audit log query failed: {message}",
    }
}

/// Persistence port for audit entries. Append and read only; entries are
/// never updated or deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append one entry.
    async fn append(&self, draft: &AuditDraft) -> Result<(), AuditPersistenceError>;

    /// List the most recent entries, newest first.
    async fn list_recent(&self, limit: i64) -> Result<Vec<AuditEntry>, AuditPersistenceError>;
}
