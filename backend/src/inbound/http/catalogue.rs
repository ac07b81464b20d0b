//! Reference catalogue and failure reason API handlers.
//!
//! Companies and equipment types feed the vehicle and assignment forms; the
//! failure reason list feeds the submission form. The reason list is the one
//! catalogue administrators maintain from inside this application.

use actix_web::{get, patch, post, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    CataloguePersistenceError, FailureReasonPersistenceError,
};
use crate::domain::{sanitize_text, Company, EquipmentType, Error, FailureReasonEntry};

use super::session::SessionContext;
use super::state::AppState;
use super::ApiResult;

fn map_catalogue_error(error: CataloguePersistenceError) -> Error {
    match error {
        CataloguePersistenceError::Connection { message } => Error::service_unavailable(message),
        CataloguePersistenceError::Query { message } => Error::internal(message),
    }
}

fn map_reason_error(error: FailureReasonPersistenceError) -> Error {
    match error {
        FailureReasonPersistenceError::Connection { message } => {
            Error::service_unavailable(message)
        }
        FailureReasonPersistenceError::Query { message } => Error::internal(message),
        FailureReasonPersistenceError::DuplicateName { name } => {
            Error::conflict(format!("failure reason {name} already exists"))
        }
    }
}

/// Request body for adding a failure reason.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFailureReasonRequest {
    pub name: String,
}

/// Request body for activating or retiring a failure reason.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFailureReasonRequest {
    pub is_active: bool,
}

/// Active companies, for form selectors.
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    responses(
        (status = 200, description = "Companies", body = [Company]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listCompanies"
)]
#[get("/companies")]
pub async fn list_companies(
    session: SessionContext,
    state: web::Data<AppState>,
) -> ApiResult<web::Json<Vec<Company>>> {
    session.require_actor()?;
    let companies = state
        .catalogue
        .list_companies()
        .await
        .map_err(map_catalogue_error)?;
    Ok(web::Json(companies))
}

/// Active equipment types, for form selectors.
#[utoipa::path(
    get,
    path = "/api/v1/equipment-types",
    responses(
        (status = 200, description = "Equipment types", body = [EquipmentType]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listEquipmentTypes"
)]
#[get("/equipment-types")]
pub async fn list_equipment_types(
    session: SessionContext,
    state: web::Data<AppState>,
) -> ApiResult<web::Json<Vec<EquipmentType>>> {
    session.require_actor()?;
    let types = state
        .catalogue
        .list_equipment_types()
        .await
        .map_err(map_catalogue_error)?;
    Ok(web::Json(types))
}

/// Active canonical failure reasons, for the submission form.
#[utoipa::path(
    get,
    path = "/api/v1/failure-reasons",
    responses(
        (status = 200, description = "Failure reasons", body = [FailureReasonEntry]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "listFailureReasons"
)]
#[get("/failure-reasons")]
pub async fn list_failure_reasons(
    session: SessionContext,
    state: web::Data<AppState>,
) -> ApiResult<web::Json<Vec<FailureReasonEntry>>> {
    session.require_actor()?;
    let reasons = state
        .failure_reasons
        .list_active()
        .await
        .map_err(map_reason_error)?;
    Ok(web::Json(reasons))
}

/// Add a canonical failure reason. Owner/admin only; names are unique.
#[utoipa::path(
    post,
    path = "/api/v1/failure-reasons",
    request_body = CreateFailureReasonRequest,
    responses(
        (status = 201, description = "Created", body = FailureReasonEntry),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Duplicate name", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "createFailureReason"
)]
#[post("/failure-reasons")]
pub async fn create_failure_reason(
    session: SessionContext,
    state: web::Data<AppState>,
    payload: web::Json<CreateFailureReasonRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    if !actor.effective_role().can_manage_failure_reasons() {
        return Err(Error::forbidden("role may not maintain failure reasons"));
    }
    let name = sanitize_text(Some(&payload.name));
    if name.is_empty() {
        return Err(Error::invalid_request("failure reason name is required"));
    }
    let entry = FailureReasonEntry {
        id: Uuid::new_v4(),
        name,
        is_active: true,
        created_at: Utc::now(),
    };
    state
        .failure_reasons
        .insert(&entry)
        .await
        .map_err(map_reason_error)?;
    Ok(HttpResponse::Created().json(entry))
}

/// Activate or retire a canonical failure reason. Owner/admin only.
#[utoipa::path(
    patch,
    path = "/api/v1/failure-reasons/{id}",
    request_body = UpdateFailureReasonRequest,
    responses(
        (status = 204, description = "Updated"),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "updateFailureReason"
)]
#[patch("/failure-reasons/{id}")]
pub async fn update_failure_reason(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateFailureReasonRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    if !actor.effective_role().can_manage_failure_reasons() {
        return Err(Error::forbidden("role may not maintain failure reasons"));
    }
    state
        .failure_reasons
        .set_active(path.into_inner(), payload.is_active)
        .await
        .map_err(map_reason_error)?;
    Ok(HttpResponse::NoContent().finish())
}
