//! Port abstraction for the reference catalogue: companies and equipment
//! types. Read-only from this application's point of view; both lists are
//! maintained by back-office tooling.
use async_trait::async_trait;

use crate::domain::company::{Company, EquipmentType};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by catalogue adapters.
    pub enum CataloguePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "catalogue query failed: {message}",
    }
}

/// Persistence port for the reference catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// List active companies, alphabetically.
    async fn list_companies(&self) -> Result<Vec<Company>, CataloguePersistenceError>;

    /// List active equipment types, alphabetically.
    async fn list_equipment_types(&self) -> Result<Vec<EquipmentType>, CataloguePersistenceError>;
}
