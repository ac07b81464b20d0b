//! PostgreSQL-backed `UserRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Role, UserProfile};

use super::error_map::{
    classify_conversion_error, classify_diesel_error, classify_pool_error, DbErrorKind,
};
use super::models::UserProfileRow;
use super::pool::DbPool;
use super::schema::user_profiles;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(kind: DbErrorKind) -> UserPersistenceError {
    match kind {
        DbErrorKind::Connection(message) => UserPersistenceError::connection(message),
        DbErrorKind::Query(message) => UserPersistenceError::query(message),
        DbErrorKind::UniqueViolation(message) => UserPersistenceError::duplicate_email(message),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let row: Option<UserProfileRow> = user_profiles::table
            .filter(user_profiles::id.eq(id))
            .select(UserProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|e| map_error(classify_diesel_error(e)))?;

        row.map(UserProfile::try_from)
            .transpose()
            .map_err(|e| map_error(classify_conversion_error(e)))
    }

    async fn list(&self) -> Result<Vec<UserProfile>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        let rows: Vec<UserProfileRow> = user_profiles::table
            .order(user_profiles::created_at.desc())
            .select(UserProfileRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|e| map_error(classify_diesel_error(e)))?;

        rows.into_iter()
            .map(|row| {
                UserProfile::try_from(row).map_err(|e| map_error(classify_conversion_error(e)))
            })
            .collect()
    }

    async fn insert(&self, profile: &UserProfile) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::insert_into(user_profiles::table)
            .values(UserProfileRow::from(profile))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::update(user_profiles::table.filter(user_profiles::id.eq(id)))
            .set((
                user_profiles::is_active.eq(is_active),
                user_profiles::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| map_error(classify_pool_error(e)))?;

        diesel::update(user_profiles::table.filter(user_profiles::id.eq(id)))
            .set((
                user_profiles::role.eq(role.as_str()),
                user_profiles::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| map_error(classify_diesel_error(e)))
    }
}
