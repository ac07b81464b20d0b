//! Port abstraction for inspection persistence adapters and their errors.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::inspection::{ChecklistItem, Inspection};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by inspection repository adapters.
    pub enum InspectionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "inspection repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "inspection repository query failed: {message}",
    }
}

/// Outcome of the conditional verify write.
///
/// The write is keyed on `verified_at` still being absent; when another
/// verifier won the race the update touches zero rows and the adapter reports
/// [`VerifyOutcome::AlreadyVerified`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// This call performed the verification.
    Verified,
    /// Someone else verified first; the caller should refresh its copy.
    AlreadyVerified,
}

/// Persistence port for inspections and their checklist items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InspectionRepository: Send + Sync {
    /// Fetch an inspection by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Inspection>, InspectionPersistenceError>;

    /// List inspections, newest first.
    async fn list(&self) -> Result<Vec<Inspection>, InspectionPersistenceError>;

    /// List inspections belonging to one vehicle, newest first.
    async fn list_for_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<Inspection>, InspectionPersistenceError>;

    /// Insert a newly scheduled inspection.
    async fn insert(&self, inspection: &Inspection) -> Result<(), InspectionPersistenceError>;

    /// Write the started-at/status columns for one inspection.
    async fn record_start(&self, inspection: &Inspection)
        -> Result<(), InspectionPersistenceError>;

    /// Write the submission columns (result, failure reason, notes,
    /// completed-at, status) for one inspection.
    async fn record_submission(
        &self,
        inspection: &Inspection,
    ) -> Result<(), InspectionPersistenceError>;

    /// Write the cancelled status for one inspection.
    async fn record_cancellation(
        &self,
        inspection: &Inspection,
    ) -> Result<(), InspectionPersistenceError>;

    /// Conditionally set `verified_by`/`verified_at`, guarded on the column
    /// still being null. Never a read-then-write.
    async fn verify(
        &self,
        id: Uuid,
        verified_by: Uuid,
        verified_at: DateTime<Utc>,
    ) -> Result<VerifyOutcome, InspectionPersistenceError>;

    /// Append checklist items recorded with a submission.
    async fn append_checklist(
        &self,
        items: &[ChecklistItem],
    ) -> Result<(), InspectionPersistenceError>;
}
