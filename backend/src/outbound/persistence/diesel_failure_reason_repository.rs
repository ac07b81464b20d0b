//! PostgreSQL-backed `FailureReasonRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{FailureReasonPersistenceError, FailureReasonRepository};
use crate::domain::FailureReasonEntry;

use super::error_map::{classify_diesel_error, classify_pool_error, DbErrorKind};
use super::models::FailureReasonRow;
use super::pool::DbPool;
use super::schema::failure_reasons;

/// Diesel-backed implementation of the `FailureReasonRepository` port.
#[derive(Clone)]
pub struct DieselFailureReasonRepository {
    pool: DbPool,
}

impl DieselFailureReasonRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(kind: DbErrorKind) -> FailureReasonPersistenceError {
    match kind {
        DbErrorKind::Connection(message) => FailureReasonPersistenceError::connection(message),
        DbErrorKind::Query(message) => FailureReasonPersistenceError::query(message),
        DbErrorKind::UniqueViolation(message) => {
            FailureReasonPersistenceError::duplicate_name(message)
        }
    }
}

#[async_trait]
impl FailureReasonRepository for DieselFailureReasonRepository {
    async fn list_active(
        &self,
    ) -> Result<Vec<FailureReasonEntry>, FailureReasonPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let rows: Vec<FailureReasonRow> = failure_reasons::table
            .filter(failure_reasons::is_active.eq(true))
            .order(failure_reasons::name.asc())
            .select(FailureReasonRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_error(classify_diesel_error(e)))?;

        Ok(rows.into_iter().map(FailureReasonEntry::from).collect())
    }

    async fn insert(
        &self,
        entry: &FailureReasonEntry,
    ) -> Result<(), FailureReasonPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::insert_into(failure_reasons::table)
            .values(FailureReasonRow::from(entry))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn set_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<(), FailureReasonPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::update(failure_reasons::table.filter(failure_reasons::id.eq(id)))
            .set(failure_reasons::is_active.eq(is_active))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }
}
