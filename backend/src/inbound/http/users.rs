//! User administration API handlers.

use actix_web::{get, patch, post, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::{Error, ProvisionUserRequest, Role, UserProfile};

use super::session::SessionContext;
use super::state::AppState;
use super::ApiResult;

/// Request body for provisioning a user.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub company_id: Option<Uuid>,
}

/// Request body for updating a user. Both fields optional; role changes are
/// owner-only.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub is_active: Option<bool>,
    pub role: Option<Role>,
}

/// List user profiles.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [UserProfile]),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    session: SessionContext,
    state: web::Data<AppState>,
) -> ApiResult<web::Json<Vec<UserProfile>>> {
    let actor = session.require_actor()?;
    Ok(web::Json(state.users.list(&actor).await?))
}

/// Provision a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = UserProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Duplicate email", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    session: SessionContext,
    state: web::Data<AppState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let request = payload.into_inner();
    let profile = state
        .users
        .provision(
            &actor,
            ProvisionUserRequest {
                email: request.email,
                password: Zeroizing::new(request.password),
                full_name: request.full_name,
                role: request.role,
                phone: request.phone,
                company_id: request.company_id,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Deactivate, reactivate, or re-role an account.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserProfile),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{id}")]
pub async fn update_user(
    session: SessionContext,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let actor = session.require_actor()?;
    let id = path.into_inner();
    let request = payload.into_inner();

    let mut profile = match request.role {
        Some(role) => Some(state.users.change_role(&actor, id, role).await?),
        None => None,
    };
    if let Some(is_active) = request.is_active {
        profile = Some(state.users.set_active(&actor, id, is_active).await?);
    }
    match profile {
        Some(profile) => Ok(web::Json(profile)),
        None => Err(Error::invalid_request("nothing to update")),
    }
}
