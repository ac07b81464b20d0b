//! PostgreSQL-backed `InspectionRepository` implementation using Diesel.
//!
//! The verify write is the one conditional update in the system: it filters
//! on `verified_at IS NULL` in addition to the primary key, and reports the
//! affected-row count back as a [`VerifyOutcome`] so the caller can tell a
//! first verification from a lost race without a read-then-write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{InspectionPersistenceError, InspectionRepository, VerifyOutcome};
use crate::domain::{ChecklistItem, Inspection};

use super::error_map::{
    classify_conversion_error, classify_diesel_error, classify_pool_error, DbErrorKind,
};
use super::models::{ChecklistItemRow, InspectionRow};
use super::pool::DbPool;
use super::schema::{inspection_checklist_items, inspections};

/// Diesel-backed implementation of the `InspectionRepository` port.
#[derive(Clone)]
pub struct DieselInspectionRepository {
    pool: DbPool,
}

impl DieselInspectionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(kind: DbErrorKind) -> InspectionPersistenceError {
    match kind {
        DbErrorKind::Connection(message) => InspectionPersistenceError::connection(message),
        DbErrorKind::Query(message) | DbErrorKind::UniqueViolation(message) => {
            InspectionPersistenceError::query(message)
        }
    }
}

fn rows_to_inspections(rows: Vec<InspectionRow>) -> Result<Vec<Inspection>, InspectionPersistenceError> {
    rows.into_iter()
        .map(|row| {
            Inspection::try_from(row).map_err(|e| map_error(classify_conversion_error(e)))
        })
        .collect()
}

#[async_trait]
impl InspectionRepository for DieselInspectionRepository {
    async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<Inspection>, InspectionPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let row: Option<InspectionRow> = inspections::table
            .filter(inspections::id.eq(id))
            .select(InspectionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| map_error(classify_diesel_error(e)))?;

        row.map(Inspection::try_from)
            .transpose()
            .map_err(|e| map_error(classify_conversion_error(e)))
    }

    async fn list(&self) -> Result<Vec<Inspection>, InspectionPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let rows: Vec<InspectionRow> = inspections::table
            .order(inspections::scheduled_date.desc())
            .select(InspectionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_error(classify_diesel_error(e)))?;
        rows_to_inspections(rows)
    }

    async fn list_for_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<Inspection>, InspectionPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let rows: Vec<InspectionRow> = inspections::table
            .filter(inspections::vehicle_equipment_id.eq(vehicle_id))
            .order(inspections::scheduled_date.desc())
            .select(InspectionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_error(classify_diesel_error(e)))?;
        rows_to_inspections(rows)
    }

    async fn insert(&self, inspection: &Inspection) -> Result<(), InspectionPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::insert_into(inspections::table)
            .values(InspectionRow::from(inspection))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn record_start(
        &self,
        inspection: &Inspection,
    ) -> Result<(), InspectionPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::update(inspections::table.filter(inspections::id.eq(inspection.id)))
            .set((
                inspections::status.eq(inspection.status.as_str()),
                inspections::started_at.eq(inspection.started_at),
                inspections::updated_at.eq(inspection.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn record_submission(
        &self,
        inspection: &Inspection,
    ) -> Result<(), InspectionPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::update(inspections::table.filter(inspections::id.eq(inspection.id)))
            .set((
                inspections::status.eq(inspection.status.as_str()),
                inspections::result.eq(inspection.result.as_str()),
                inspections::failure_reason.eq(inspection.failure_reason.to_legacy_string()),
                inspections::notes.eq(inspection.notes.clone()),
                inspections::completed_at.eq(inspection.completed_at),
                inspections::updated_at.eq(inspection.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn record_cancellation(
        &self,
        inspection: &Inspection,
    ) -> Result<(), InspectionPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::update(inspections::table.filter(inspections::id.eq(inspection.id)))
            .set((
                inspections::status.eq(inspection.status.as_str()),
                inspections::updated_at.eq(inspection.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn verify(
        &self,
        id: Uuid,
        verified_by: Uuid,
        verified_at: DateTime<Utc>,
    ) -> Result<VerifyOutcome, InspectionPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let updated_rows = diesel::update(
            inspections::table.filter(
                inspections::id
                    .eq(id)
                    .and(inspections::verified_at.is_null()),
            ),
        )
        .set((
            inspections::verified_by.eq(Some(verified_by)),
            inspections::verified_at.eq(Some(verified_at)),
            inspections::updated_at.eq(verified_at),
        ))
        .execute(&mut conn)
        .await
        .map_err(|e| map_error(classify_diesel_error(e)))?;

        // Zero rows means the guard held: someone else verified first.
        if updated_rows == 0 {
            Ok(VerifyOutcome::AlreadyVerified)
        } else {
            Ok(VerifyOutcome::Verified)
        }
    }

    async fn append_checklist(
        &self,
        items: &[ChecklistItem],
    ) -> Result<(), InspectionPersistenceError> {
        if items.is_empty() {
            return Ok(());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let rows: Vec<ChecklistItemRow> = items.iter().map(ChecklistItemRow::from).collect();
        diesel::insert_into(inspection_checklist_items::table)
            .values(&rows)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }
}
