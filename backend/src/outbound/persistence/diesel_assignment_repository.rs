//! PostgreSQL-backed `AssignmentRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AssignmentPersistenceError, AssignmentRepository};
use crate::domain::{Assignment, AssignmentStatus};

use super::error_map::{
    classify_conversion_error, classify_diesel_error, classify_pool_error, DbErrorKind,
};
use super::models::AssignmentRow;
use super::pool::DbPool;
use super::schema::assignments;

/// Diesel-backed implementation of the `AssignmentRepository` port.
#[derive(Clone)]
pub struct DieselAssignmentRepository {
    pool: DbPool,
}

impl DieselAssignmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(kind: DbErrorKind) -> AssignmentPersistenceError {
    match kind {
        DbErrorKind::Connection(message) => AssignmentPersistenceError::connection(message),
        DbErrorKind::Query(message) | DbErrorKind::UniqueViolation(message) => {
            AssignmentPersistenceError::query(message)
        }
    }
}

#[async_trait]
impl AssignmentRepository for DieselAssignmentRepository {
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Assignment>, AssignmentPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let row: Option<AssignmentRow> = assignments::table
            .filter(assignments::id.eq(id))
            .select(AssignmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| map_error(classify_diesel_error(e)))?;

        row.map(Assignment::try_from)
            .transpose()
            .map_err(|e| map_error(classify_conversion_error(e)))
    }

    async fn list(&self) -> Result<Vec<Assignment>, AssignmentPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let rows: Vec<AssignmentRow> = assignments::table
            .order(assignments::scheduled_date.asc())
            .select(AssignmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_error(classify_diesel_error(e)))?;

        rows.into_iter()
            .map(|row| {
                Assignment::try_from(row).map_err(|e| map_error(classify_conversion_error(e)))
            })
            .collect()
    }

    async fn insert(&self, assignment: &Assignment) -> Result<(), AssignmentPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::insert_into(assignments::table)
            .values(AssignmentRow::from(assignment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn update(&self, assignment: &Assignment) -> Result<(), AssignmentPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::update(assignments::table.filter(assignments::id.eq(assignment.id)))
            .set(AssignmentRow::from(assignment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AssignmentStatus,
    ) -> Result<(), AssignmentPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::update(assignments::table.filter(assignments::id.eq(id)))
            .set((
                assignments::status.eq(status.as_str()),
                assignments::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }
}
