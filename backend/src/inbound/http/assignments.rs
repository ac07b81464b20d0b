//! Assignment API handlers.

use actix_web::{get, patch, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    sanitize_field, Assignment, AssignmentInspectionRequest, CreateAssignmentRequest,
    EditAssignmentRequest, Error, Inspection, InspectionType,
};

use super::session::SessionContext;
use super::state::AppState;
use super::ApiResult;

/// Request body for creating or editing an assignment.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    pub company_id: Uuid,
    pub inspector_id: Option<Uuid>,
    pub scheduled_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Target of an assignment status change. `Rescheduled` is not requestable;
/// it only arises from a date edit.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatusTarget {
    /// Mark the booking fulfilled.
    Done,
    /// Flag the booking as slipped.
    Delayed,
}

/// Request body for an assignment status change.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStatusRequest {
    pub status: AssignmentStatusTarget,
}

/// Request body for spawning an inspection from an assignment.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpawnInspectionRequest {
    pub vehicle_id: Uuid,
    pub inspection_type: InspectionType,
    pub scheduled_date: DateTime<Utc>,
}

/// List assignments.
#[utoipa::path(
    get,
    path = "/api/v1/assignments",
    responses(
        (status = 200, description = "Assignments", body = [Assignment]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["assignments"],
    operation_id = "listAssignments"
)]
#[get("/assignments")]
pub async fn list_assignments(
    session: SessionContext,
    state: web::Data<AppState>,
) -> ApiResult<web::Json<Vec<Assignment>>> {
    session.require_actor()?;
    Ok(web::Json(state.assignments.list().await?))
}

/// Book a company for inspection.
#[utoipa::path(
    post,
    path = "/api/v1/assignments",
    request_body = AssignmentRequest,
    responses(
        (status = 201, description = "Created", body = Assignment),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["assignments"],
    operation_id = "createAssignment"
)]
#[post("/assignments")]
pub async fn create_assignment(
    session: SessionContext,
    state: web::Data<AppState>,
    payload: web::Json<AssignmentRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let request = payload.into_inner();
    let assignment = state
        .assignments
        .create(
            &actor,
            CreateAssignmentRequest {
                company_id: request.company_id,
                inspector_id: request.inspector_id,
                scheduled_date: request.scheduled_date,
                notes: sanitize_field(request.notes.as_deref(), 1000),
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(assignment))
}

/// Edit an assignment. Moving the date of a booking still in its original
/// state reschedules it as a side effect.
#[utoipa::path(
    patch,
    path = "/api/v1/assignments/{id}",
    request_body = AssignmentRequest,
    responses(
        (status = 200, description = "Updated", body = Assignment),
        (status = 409, description = "Assignment is done", body = Error)
    ),
    tags = ["assignments"],
    operation_id = "editAssignment"
)]
#[patch("/assignments/{id}")]
pub async fn edit_assignment(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<AssignmentRequest>,
) -> ApiResult<web::Json<Assignment>> {
    let actor = session.require_actor()?;
    let request = payload.into_inner();
    let assignment = state
        .assignments
        .edit(
            &actor,
            path.into_inner(),
            EditAssignmentRequest {
                company_id: request.company_id,
                inspector_id: request.inspector_id,
                scheduled_date: request.scheduled_date,
                notes: sanitize_field(request.notes.as_deref(), 1000),
            },
        )
        .await?;
    Ok(web::Json(assignment))
}

/// Mark an assignment done or delayed.
#[utoipa::path(
    post,
    path = "/api/v1/assignments/{id}/status",
    request_body = AssignmentStatusRequest,
    responses(
        (status = 200, description = "Updated", body = Assignment),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Illegal transition", body = Error)
    ),
    tags = ["assignments"],
    operation_id = "setAssignmentStatus"
)]
#[post("/assignments/{id}/status")]
pub async fn set_assignment_status(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<AssignmentStatusRequest>,
) -> ApiResult<web::Json<Assignment>> {
    let actor = session.require_actor()?;
    let id = path.into_inner();
    let assignment = match payload.status {
        AssignmentStatusTarget::Done => state.assignments.mark_done(&actor, id).await?,
        AssignmentStatusTarget::Delayed => state.assignments.mark_delayed(&actor, id).await?,
    };
    Ok(web::Json(assignment))
}

/// Spawn an inspection from an open assignment.
#[utoipa::path(
    post,
    path = "/api/v1/assignments/{id}/inspections",
    request_body = SpawnInspectionRequest,
    responses(
        (status = 201, description = "Inspection scheduled", body = Inspection),
        (status = 409, description = "Assignment is done", body = Error)
    ),
    tags = ["assignments"],
    operation_id = "createAssignmentInspection"
)]
#[post("/assignments/{id}/inspections")]
pub async fn create_assignment_inspection(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<SpawnInspectionRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let request = payload.into_inner();
    let inspection = state
        .assignments
        .create_inspection(
            &actor,
            path.into_inner(),
            AssignmentInspectionRequest {
                vehicle_id: request.vehicle_id,
                inspection_type: request.inspection_type,
                scheduled_date: request.scheduled_date,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(inspection))
}
