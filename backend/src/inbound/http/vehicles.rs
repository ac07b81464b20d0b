//! Vehicle API handlers.
//!
//! List and detail responses are masked for the viewer's effective role
//! before they leave the server; minimal-data roles lose the driver and
//! national-id fields entirely rather than receiving masked values.

use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    mask_name, mask_national_id, mask_plate_number, sanitize_field, Error, PlateNumber, Role,
    Vehicle, VehicleStatus,
};

use super::session::SessionContext;
use super::state::AppState;
use super::ApiResult;

/// Vehicle row shaped for the viewer's effective role.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleView {
    pub id: Uuid,
    pub plate_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,
    pub company_id: Option<Uuid>,
    pub equipment_type_id: Option<Uuid>,
    pub status: VehicleStatus,
    /// Effective status after the blacklist override and the read-time
    /// overdue derivation; the stored status stays in `status`.
    pub display_status: VehicleStatus,
    pub next_inspection_date: Option<NaiveDate>,
    pub blacklisted: bool,
}

impl VehicleView {
    /// Shape a vehicle row for `role` as of `today`.
    pub fn for_role(vehicle: &Vehicle, role: Role, today: NaiveDate) -> Self {
        let minimal = role.is_minimal_data();
        Self {
            id: vehicle.id,
            plate_number: mask_plate_number(Some(vehicle.plate_number.as_ref()), role),
            driver_name: (!minimal)
                .then(|| mask_name(vehicle.driver_name.as_deref(), role)),
            national_id: (!minimal)
                .then(|| mask_national_id(vehicle.national_id.as_deref(), role)),
            company_id: vehicle.company_id,
            equipment_type_id: vehicle.equipment_type_id,
            status: vehicle.status,
            display_status: vehicle.display_status(today),
            next_inspection_date: vehicle.next_inspection_date,
            blacklisted: vehicle.blacklisted,
        }
    }
}

/// Request body for registering a vehicle.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    pub plate_number: String,
    pub driver_name: Option<String>,
    pub national_id: Option<String>,
    pub company_id: Option<Uuid>,
    pub equipment_type_id: Option<Uuid>,
    pub year_of_manufacture: Option<i32>,
    pub project: Option<String>,
    pub gate: Option<String>,
    pub next_inspection_date: Option<NaiveDate>,
}

/// Request body for a direct status selection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub status: VehicleStatus,
}

/// Query parameters for removing a vehicle from the blacklist.
#[derive(Debug, Deserialize)]
pub struct UnblacklistQuery {
    /// Status to land on; defaults to requiring a fresh inspection.
    pub target: Option<VehicleStatus>,
}

fn parse_plate(raw: &str) -> Result<PlateNumber, Error> {
    PlateNumber::new(raw).map_err(|error| {
        Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "plateNumber" }))
    })
}

/// List vehicles, masked for the viewer.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    responses(
        (status = 200, description = "Vehicles", body = [VehicleView]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["vehicles"],
    operation_id = "listVehicles"
)]
#[get("/vehicles")]
pub async fn list_vehicles(
    session: SessionContext,
    state: web::Data<AppState>,
) -> ApiResult<web::Json<Vec<VehicleView>>> {
    let actor = session.require_actor()?;
    let role = actor.effective_role();
    let today = Utc::now().date_naive();
    let vehicles = state.fleet.list().await?;
    let views = vehicles
        .iter()
        .map(|v| VehicleView::for_role(v, role, today))
        .collect();
    Ok(web::Json(views))
}

/// Fetch one vehicle, masked for the viewer.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    responses(
        (status = 200, description = "Vehicle", body = VehicleView),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["vehicles"],
    operation_id = "vehicleDetail"
)]
#[get("/vehicles/{id}")]
pub async fn vehicle_detail(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<VehicleView>> {
    let actor = session.require_actor()?;
    let vehicle = state.fleet.detail(path.into_inner()).await?;
    Ok(web::Json(VehicleView::for_role(
        &vehicle,
        actor.effective_role(),
        Utc::now().date_naive(),
    )))
}

/// Register a new vehicle.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Created", body = VehicleView),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Duplicate plate", body = Error)
    ),
    tags = ["vehicles"],
    operation_id = "createVehicle"
)]
#[post("/vehicles")]
pub async fn create_vehicle(
    session: SessionContext,
    state: web::Data<AppState>,
    payload: web::Json<CreateVehicleRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let request = payload.into_inner();
    let now = Utc::now();
    let vehicle = Vehicle {
        id: Uuid::new_v4(),
        plate_number: parse_plate(&request.plate_number)?,
        driver_name: sanitize_field(request.driver_name.as_deref(), 100),
        national_id: sanitize_field(request.national_id.as_deref(), 30),
        company_id: request.company_id,
        equipment_type_id: request.equipment_type_id,
        year_of_manufacture: request.year_of_manufacture,
        project: sanitize_field(request.project.as_deref(), 100),
        gate: sanitize_field(request.gate.as_deref(), 50),
        status: VehicleStatus::UpdatedInspectionRequired,
        next_inspection_date: request.next_inspection_date,
        blacklisted: false,
        created_by: Some(actor.id),
        created_at: now,
        updated_at: now,
    };
    let created = state.fleet.create(&actor, vehicle).await?;
    Ok(HttpResponse::Created().json(VehicleView::for_role(
        &created,
        actor.effective_role(),
        now.date_naive(),
    )))
}

/// Update a vehicle's editable fields.
#[utoipa::path(
    patch,
    path = "/api/v1/vehicles/{id}",
    request_body = CreateVehicleRequest,
    responses(
        (status = 200, description = "Updated", body = VehicleView),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["vehicles"],
    operation_id = "updateVehicle"
)]
#[patch("/vehicles/{id}")]
pub async fn update_vehicle(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<CreateVehicleRequest>,
) -> ApiResult<web::Json<VehicleView>> {
    let actor = session.require_actor()?;
    let request = payload.into_inner();
    let mut vehicle = state.fleet.detail(path.into_inner()).await?;
    vehicle.plate_number = parse_plate(&request.plate_number)?;
    vehicle.driver_name = sanitize_field(request.driver_name.as_deref(), 100);
    vehicle.national_id = sanitize_field(request.national_id.as_deref(), 30);
    vehicle.company_id = request.company_id;
    vehicle.equipment_type_id = request.equipment_type_id;
    vehicle.year_of_manufacture = request.year_of_manufacture;
    vehicle.project = sanitize_field(request.project.as_deref(), 100);
    vehicle.gate = sanitize_field(request.gate.as_deref(), 50);
    vehicle.next_inspection_date = request.next_inspection_date;
    vehicle.updated_at = Utc::now();
    let updated = state.fleet.update(&actor, vehicle).await?;
    Ok(web::Json(VehicleView::for_role(
        &updated,
        actor.effective_role(),
        Utc::now().date_naive(),
    )))
}

/// Select a vehicle status directly.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles/{id}/status",
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Updated", body = VehicleView),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Illegal transition", body = Error)
    ),
    tags = ["vehicles"],
    operation_id = "setVehicleStatus"
)]
#[post("/vehicles/{id}/status")]
pub async fn set_vehicle_status(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<SetStatusRequest>,
) -> ApiResult<web::Json<VehicleView>> {
    let actor = session.require_actor()?;
    let updated = state
        .fleet
        .set_status(&actor, path.into_inner(), payload.status)
        .await?;
    Ok(web::Json(VehicleView::for_role(
        &updated,
        actor.effective_role(),
        Utc::now().date_naive(),
    )))
}

/// Bar a vehicle from operation.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles/{id}/blacklist",
    responses(
        (status = 200, description = "Blacklisted", body = VehicleView),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["vehicles"],
    operation_id = "blacklistVehicle"
)]
#[post("/vehicles/{id}/blacklist")]
pub async fn blacklist_vehicle(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<VehicleView>> {
    let actor = session.require_actor()?;
    let updated = state.fleet.blacklist(&actor, path.into_inner()).await?;
    Ok(web::Json(VehicleView::for_role(
        &updated,
        actor.effective_role(),
        Utc::now().date_naive(),
    )))
}

/// Return a vehicle to normal operation.
#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}/blacklist",
    responses(
        (status = 200, description = "Removed from blacklist", body = VehicleView),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Not blacklisted", body = Error)
    ),
    tags = ["vehicles"],
    operation_id = "unblacklistVehicle"
)]
#[delete("/vehicles/{id}/blacklist")]
pub async fn unblacklist_vehicle(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<UnblacklistQuery>,
) -> ApiResult<web::Json<VehicleView>> {
    let actor = session.require_actor()?;
    let updated = state
        .fleet
        .unblacklist(&actor, path.into_inner(), query.target)
        .await?;
    Ok(web::Json(VehicleView::for_role(
        &updated,
        actor.effective_role(),
        Utc::now().date_naive(),
    )))
}
