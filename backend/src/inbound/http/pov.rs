//! View-as (POV) endpoints.
//!
//! Owners preview the application as another role without re-authenticating.
//! The selection persists in the session cookie and is resolved into the
//! effective role on every request; any other role is refused here and
//! ignored if a stale value is somehow present.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, Role, RoleContext};

use super::session::SessionContext;
use super::ApiResult;

/// Request body for activating a preview.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewAsRequest {
    pub role: Role,
}

/// Current role context for the session.
#[utoipa::path(
    get,
    path = "/api/v1/session/role-context",
    responses(
        (status = 200, description = "Role context", body = RoleContext),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["session"],
    operation_id = "roleContext"
)]
#[get("/session/role-context")]
pub async fn role_context(session: SessionContext) -> ApiResult<web::Json<RoleContext>> {
    let actor = session.require_actor()?;
    Ok(web::Json(actor.roles))
}

/// Activate a preview of another role. Owner only.
#[utoipa::path(
    post,
    path = "/api/v1/session/view-as",
    request_body = ViewAsRequest,
    responses(
        (status = 200, description = "Preview active", body = RoleContext),
        (status = 403, description = "Not an owner", body = Error)
    ),
    tags = ["session"],
    operation_id = "setViewAs"
)]
#[post("/session/view-as")]
pub async fn set_view_as(
    session: SessionContext,
    payload: web::Json<ViewAsRequest>,
) -> ApiResult<web::Json<RoleContext>> {
    let actor = session.require_actor()?;
    let context = session.set_view_as(&actor, Some(payload.role))?;
    Ok(web::Json(context))
}

/// Dismiss the preview and return to the real role.
#[utoipa::path(
    delete,
    path = "/api/v1/session/view-as",
    responses(
        (status = 200, description = "Preview cleared", body = RoleContext),
        (status = 403, description = "Not an owner", body = Error)
    ),
    tags = ["session"],
    operation_id = "clearViewAs"
)]
#[delete("/session/view-as")]
pub async fn clear_view_as(session: SessionContext) -> ApiResult<HttpResponse> {
    let actor = session.require_actor()?;
    let context = session.set_view_as(&actor, None)?;
    Ok(HttpResponse::Ok().json(context))
}

#[cfg(test)]
mod tests {
    //! Session-backed preview behaviour.
    use super::*;
    use crate::inbound::http::test_utils::{test_login, test_session_middleware};
    use actix_web::{test as actix_test, App};
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .service(test_login)
                .service(role_context)
                .service(set_view_as)
                .service(clear_view_as),
        )
    }

    async fn login(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        role: &str,
    ) -> actix_web::cookie::Cookie<'static> {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/test-login")
                .set_json(json!({
                    "id": Uuid::new_v4(),
                    "email": "subject@example.com",
                    "role": role,
                }))
                .to_request(),
        )
        .await;
        assert!(response.status().is_success());
        response
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    #[actix_web::test]
    async fn owner_activates_and_clears_a_preview() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login(&app, "owner").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/session/view-as")
                .cookie(cookie.clone())
                .set_json(json!({ "role": "contractor" }))
                .to_request(),
        )
        .await;
        assert!(response.status().is_success());
        // The preview cookie changes; keep using the refreshed session.
        let preview_cookie = response
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .map(|c| c.into_owned())
            .unwrap_or(cookie);

        let body = actix_test::call_and_read_body(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/session/role-context")
                .cookie(preview_cookie.clone())
                .to_request(),
        )
        .await;
        let value: Value = serde_json::from_slice(&body).expect("context JSON");
        assert_eq!(value["actual"], "owner");
        assert_eq!(value["viewAs"], "contractor");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/session/view-as")
                .cookie(preview_cookie)
                .to_request(),
        )
        .await;
        assert!(response.status().is_success());
    }

    #[actix_web::test]
    async fn non_owner_is_refused() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = login(&app, "admin").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/session/view-as")
                .cookie(cookie)
                .set_json(json!({ "role": "contractor" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn anonymous_requests_are_unauthorised() {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/session/role-context")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
