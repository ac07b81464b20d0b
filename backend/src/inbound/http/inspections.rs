//! Inspection API handlers.

use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    sanitize_field, ChecklistDraft, Error, FailureReason, Inspection, InspectionResult,
    InspectionType, ScheduleInspectionRequest, SubmitInspectionRequest,
};

use super::session::SessionContext;
use super::state::AppState;
use super::ApiResult;

/// Request body for scheduling an inspection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInspectionRequest {
    pub vehicle_id: Uuid,
    pub inspection_type: InspectionType,
    pub assignment_id: Option<Uuid>,
    pub assigned_inspector_id: Option<Uuid>,
    pub scheduled_date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// One checklist line in a submission body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItemRequest {
    pub item_name: String,
    pub item_description: Option<String>,
    pub passed: Option<bool>,
    pub notes: Option<String>,
}

/// Request body for submitting an inspection result.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub result: InspectionResult,
    /// Selected canonical reasons; required with a remark-free failure.
    #[serde(default)]
    pub failure_reasons: Vec<String>,
    /// Free-text remark for anything the canonical list does not cover.
    pub other_reason: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItemRequest>,
}

/// Response body for a verify call.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponseBody {
    pub inspection: Inspection,
    /// True when another verifier signed off first and this call only
    /// refreshed state.
    pub already_verified: bool,
}

/// List inspections.
#[utoipa::path(
    get,
    path = "/api/v1/inspections",
    responses(
        (status = 200, description = "Inspections", body = [Inspection]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["inspections"],
    operation_id = "listInspections"
)]
#[get("/inspections")]
pub async fn list_inspections(
    session: SessionContext,
    state: web::Data<AppState>,
) -> ApiResult<web::Json<Vec<Inspection>>> {
    session.require_actor()?;
    Ok(web::Json(state.inspections.list().await?))
}

/// List one vehicle's inspections, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}/inspections",
    responses(
        (status = 200, description = "Inspections", body = [Inspection]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["inspections"],
    operation_id = "listVehicleInspections"
)]
#[get("/vehicles/{id}/inspections")]
pub async fn list_vehicle_inspections(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Vec<Inspection>>> {
    session.require_actor()?;
    Ok(web::Json(
        state
            .inspections
            .list_for_vehicle(path.into_inner())
            .await?,
    ))
}

/// Fetch one inspection.
#[utoipa::path(
    get,
    path = "/api/v1/inspections/{id}",
    responses(
        (status = 200, description = "Inspection", body = Inspection),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["inspections"],
    operation_id = "inspectionDetail"
)]
#[get("/inspections/{id}")]
pub async fn inspection_detail(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Inspection>> {
    session.require_actor()?;
    Ok(web::Json(state.inspections.detail(path.into_inner()).await?))
}

/// Schedule a new inspection.
#[utoipa::path(
    post,
    path = "/api/v1/inspections",
    request_body = CreateInspectionRequest,
    responses(
        (status = 201, description = "Scheduled", body = Inspection),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["inspections"],
    operation_id = "createInspection"
)]
#[post("/inspections")]
pub async fn create_inspection(
    session: SessionContext,
    state: web::Data<AppState>,
    payload: web::Json<CreateInspectionRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let request = payload.into_inner();
    let inspection = state
        .inspections
        .schedule(
            &actor,
            ScheduleInspectionRequest {
                vehicle_id: request.vehicle_id,
                inspection_type: request.inspection_type,
                assignment_id: request.assignment_id,
                assigned_inspector_id: request.assigned_inspector_id,
                scheduled_date: request.scheduled_date,
                notes: sanitize_field(request.notes.as_deref(), 1000),
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(inspection))
}

/// Begin work on a scheduled inspection.
#[utoipa::path(
    post,
    path = "/api/v1/inspections/{id}/start",
    responses(
        (status = 200, description = "Started", body = Inspection),
        (status = 409, description = "Not startable", body = Error)
    ),
    tags = ["inspections"],
    operation_id = "startInspection"
)]
#[post("/inspections/{id}/start")]
pub async fn start_inspection(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Inspection>> {
    let actor = session.require_actor()?;
    Ok(web::Json(
        state.inspections.start(&actor, path.into_inner()).await?,
    ))
}

/// Submit the inspection result and complete it.
#[utoipa::path(
    post,
    path = "/api/v1/inspections/{id}/submit",
    request_body = SubmitRequest,
    responses(
        (status = 200, description = "Completed", body = Inspection),
        (status = 400, description = "Missing failure reason", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Already closed", body = Error)
    ),
    tags = ["inspections"],
    operation_id = "submitInspection"
)]
#[post("/inspections/{id}/submit")]
pub async fn submit_inspection(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<SubmitRequest>,
) -> ApiResult<web::Json<Inspection>> {
    let actor = session.require_actor()?;
    let request = payload.into_inner();
    let failure_reason = FailureReason::new(
        request.failure_reasons,
        request
            .other_reason
            .as_deref()
            .and_then(|r| sanitize_field(Some(r), 500)),
    );
    let checklist = request
        .checklist
        .into_iter()
        .map(|item| ChecklistDraft {
            item_name: item.item_name,
            item_description: item.item_description,
            passed: item.passed,
            notes: sanitize_field(item.notes.as_deref(), 500),
        })
        .collect();
    let submitted = state
        .inspections
        .submit(
            &actor,
            path.into_inner(),
            SubmitInspectionRequest {
                result: request.result,
                failure_reason,
                notes: sanitize_field(request.notes.as_deref(), 1000),
                checklist,
            },
        )
        .await?;
    Ok(web::Json(submitted))
}

/// Cancel an open inspection.
#[utoipa::path(
    post,
    path = "/api/v1/inspections/{id}/cancel",
    responses(
        (status = 200, description = "Cancelled", body = Inspection),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Already closed", body = Error)
    ),
    tags = ["inspections"],
    operation_id = "cancelInspection"
)]
#[post("/inspections/{id}/cancel")]
pub async fn cancel_inspection(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<Inspection>> {
    let actor = session.require_actor()?;
    Ok(web::Json(
        state.inspections.cancel(&actor, path.into_inner()).await?,
    ))
}

/// Verifier sign-off.
#[utoipa::path(
    post,
    path = "/api/v1/inspections/{id}/verify",
    responses(
        (status = 200, description = "Verified (or already verified)", body = VerifyResponseBody),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Not completed", body = Error)
    ),
    tags = ["inspections"],
    operation_id = "verifyInspection"
)]
#[post("/inspections/{id}/verify")]
pub async fn verify_inspection(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<VerifyResponseBody>> {
    let actor = session.require_actor()?;
    let response = state.inspections.verify(&actor, path.into_inner()).await?;
    Ok(web::Json(VerifyResponseBody {
        inspection: response.inspection,
        already_verified: response.already_verified,
    }))
}
