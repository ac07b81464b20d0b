//! PostgreSQL-backed `AuditLogRepository` implementation using Diesel.
//!
//! Append and read only. The table has no update or delete path anywhere in
//! the crate; rows carry raw change values and redaction happens at render
//! time in the domain.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AuditLogRepository, AuditPersistenceError};
use crate::domain::{AuditDraft, AuditEntry};

use super::error_map::{
    classify_conversion_error, classify_diesel_error, classify_pool_error, DbErrorKind,
};
use super::models::{AuditRow, NewAuditRow};
use super::pool::DbPool;
use super::schema::audit_logs;

/// Diesel-backed implementation of the `AuditLogRepository` port.
#[derive(Clone)]
pub struct DieselAuditLogRepository {
    pool: DbPool,
}

impl DieselAuditLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(kind: DbErrorKind) -> AuditPersistenceError {
    match kind {
        DbErrorKind::Connection(message) => AuditPersistenceError::connection(message),
        DbErrorKind::Query(message) | DbErrorKind::UniqueViolation(message) => {
            AuditPersistenceError::query(message)
        }
    }
}

#[async_trait]
impl AuditLogRepository for DieselAuditLogRepository {
    async fn append(&self, draft: &AuditDraft) -> Result<(), AuditPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let row = NewAuditRow {
            user_id: draft.user_id,
            user_email: draft.user_email.clone(),
            user_role: draft.user_role.map(|r| r.as_str().to_owned()),
            action: draft.action.as_str().to_owned(),
            table_name: Some(draft.table_name.clone()),
            record_id: Some(draft.record_id.clone()),
            old_values: draft.old_values.clone(),
            new_values: draft.new_values.clone(),
            created_at: Utc::now(),
        };
        diesel::insert_into(audit_logs::table)
            .values(row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<AuditEntry>, AuditPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let rows: Vec<AuditRow> = audit_logs::table
            .order(audit_logs::created_at.desc())
            .limit(limit)
            .select(AuditRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_error(classify_diesel_error(e)))?;

        rows.into_iter()
            .map(|row| {
                AuditEntry::try_from(row).map_err(|e| map_error(classify_conversion_error(e)))
            })
            .collect()
    }
}
