//! Shared application state handed to HTTP handlers.

use std::sync::Arc;

use crate::domain::ports::{CatalogueRepository, FailureReasonRepository};
use crate::domain::{
    AssignmentService, AuditService, FleetService, InspectionService, UserService,
};

/// Domain services and read-side ports the HTTP adapter dispatches into.
#[derive(Clone)]
pub struct AppState {
    pub fleet: FleetService,
    pub inspections: InspectionService,
    pub assignments: AssignmentService,
    pub users: UserService,
    pub audit: AuditService,
    pub catalogue: Arc<dyn CatalogueRepository>,
    pub failure_reasons: Arc<dyn FailureReasonRepository>,
}
