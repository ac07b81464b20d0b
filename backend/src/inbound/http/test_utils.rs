//! Test helpers for exercising handlers with a cookie session.

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::Role;

use super::session::SessionContext;
use super::ApiResult;

/// Session middleware with a throwaway key for handler tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(&[7; 64]))
        .cookie_name("session".into())
        .cookie_secure(false)
        .build()
}

/// Payload for [`test_login`].
#[derive(Debug, Deserialize)]
pub struct TestLogin {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Seeds the session the way the auth integration would after login.
#[post("/test-login")]
pub async fn test_login(
    session: SessionContext,
    payload: web::Json<TestLogin>,
) -> ApiResult<HttpResponse> {
    let TestLogin { id, email, role } = payload.into_inner();
    session.persist_subject(id, &email, role)?;
    Ok(HttpResponse::Ok().finish())
}
