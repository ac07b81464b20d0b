//! PostgreSQL-backed `CatalogueRepository` implementation using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CataloguePersistenceError, CatalogueRepository};
use crate::domain::{Company, EquipmentCategory, EquipmentType};

use super::error_map::{classify_diesel_error, classify_pool_error, DbErrorKind};
use super::pool::DbPool;
use super::schema::{companies, equipment_types};

/// Diesel-backed implementation of the `CatalogueRepository` port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(kind: DbErrorKind) -> CataloguePersistenceError {
    match kind {
        DbErrorKind::Connection(message) => CataloguePersistenceError::connection(message),
        DbErrorKind::Query(message) | DbErrorKind::UniqueViolation(message) => {
            CataloguePersistenceError::query(message)
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct CompanyRow {
    id: Uuid,
    name: String,
    code: Option<String>,
    project: Option<String>,
    gate: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            code: row.code,
            project: row.project,
            gate: row.gate,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = equipment_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct EquipmentTypeRow {
    id: Uuid,
    name: String,
    category: String,
    classification: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<EquipmentTypeRow> for EquipmentType {
    type Error = CataloguePersistenceError;

    fn try_from(row: EquipmentTypeRow) -> Result<Self, Self::Error> {
        let category: EquipmentCategory = row
            .category
            .parse()
            .map_err(CataloguePersistenceError::query)?;
        Ok(Self {
            id: row.id,
            name: row.name,
            category,
            classification: row.classification,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_companies(&self) -> Result<Vec<Company>, CataloguePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let rows: Vec<CompanyRow> = companies::table
            .filter(companies::is_active.eq(true))
            .order(companies::name.asc())
            .select(CompanyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_error(classify_diesel_error(e)))?;

        Ok(rows.into_iter().map(Company::from).collect())
    }

    async fn list_equipment_types(
        &self,
    ) -> Result<Vec<EquipmentType>, CataloguePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let rows: Vec<EquipmentTypeRow> = equipment_types::table
            .filter(equipment_types::is_active.eq(true))
            .order(equipment_types::name.asc())
            .select(EquipmentTypeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_error(classify_diesel_error(e)))?;

        rows.into_iter().map(EquipmentType::try_from).collect()
    }
}
