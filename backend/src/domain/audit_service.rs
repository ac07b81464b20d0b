//! Audit trail read service.
//!
//! Redaction happens here, on the way out: storage keeps raw change values,
//! and every entry handed to an adapter has sensitive keys replaced.

use std::sync::Arc;

use crate::domain::audit::AuditEntry;
use crate::domain::ports::{AuditLogRepository, AuditPersistenceError};
use crate::domain::pov::Actor;
use crate::domain::Error;

/// Default number of entries returned to the audit view.
pub const DEFAULT_AUDIT_PAGE: i64 = 200;

/// Driving service for reading the audit trail.
#[derive(Clone)]
pub struct AuditService {
    audit: Arc<dyn AuditLogRepository>,
}

fn map_persistence_error(error: AuditPersistenceError) -> Error {
    match error {
        AuditPersistenceError::Connection { message } => Error::service_unavailable(message),
        AuditPersistenceError::Query { message } => Error::internal(message),
    }
}

impl AuditService {
    /// Create a new service over the given adapter.
    pub fn new(audit: Arc<dyn AuditLogRepository>) -> Self {
        Self { audit }
    }

    /// Recent entries, newest first, with sensitive values redacted.
    pub async fn list_recent(
        &self,
        actor: &Actor,
        limit: Option<i64>,
    ) -> Result<Vec<AuditEntry>, Error> {
        if !actor.effective_role().can_read_audit_log() {
            return Err(Error::forbidden("role may not read the audit log"));
        }
        let limit = limit.unwrap_or(DEFAULT_AUDIT_PAGE).clamp(1, 1000);
        let entries = self
            .audit
            .list_recent(limit)
            .await
            .map_err(map_persistence_error)?;
        Ok(entries.iter().map(AuditEntry::redacted).collect())
    }
}
