//! Audit trail API handler. Entries arrive pre-redacted from the service.

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::{AuditEntry, Error};

use super::session::SessionContext;
use super::state::AppState;
use super::ApiResult;

/// Query parameters for the audit listing.
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<i64>,
}

/// Recent audit entries, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/audit-logs",
    responses(
        (status = 200, description = "Audit entries", body = [AuditEntry]),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["audit"],
    operation_id = "listAuditLogs"
)]
#[get("/audit-logs")]
pub async fn list_audit_logs(
    session: SessionContext,
    state: web::Data<AppState>,
    query: web::Query<AuditQuery>,
) -> ApiResult<web::Json<Vec<AuditEntry>>> {
    let actor = session.require_actor()?;
    Ok(web::Json(
        state.audit.list_recent(&actor, query.limit).await?,
    ))
}
