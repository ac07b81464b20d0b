//! Server assembly: session middleware and route registration.

pub mod config;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::web;

use crate::inbound::http::{
    assignments, audit_logs, catalogue, inspections, pov, users, vehicles, AppState,
};

pub use config::ServerConfig;

/// Session middleware for the API scope.
pub fn session_middleware(config: &ServerConfig) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), config.key.clone())
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(config.cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(config.same_site)
        .build()
}

/// Register every API route on a `/api/v1` scope.
pub fn api_scope(
    state: web::Data<AppState>,
    session: SessionMiddleware<CookieSessionStore>,
) -> actix_web::Scope<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope("/api/v1")
        .wrap(session)
        .app_data(state)
        .service(pov::role_context)
        .service(pov::set_view_as)
        .service(pov::clear_view_as)
        .service(vehicles::list_vehicles)
        .service(vehicles::vehicle_detail)
        .service(vehicles::create_vehicle)
        .service(vehicles::update_vehicle)
        .service(vehicles::set_vehicle_status)
        .service(vehicles::blacklist_vehicle)
        .service(vehicles::unblacklist_vehicle)
        .service(inspections::list_inspections)
        .service(inspections::list_vehicle_inspections)
        .service(inspections::inspection_detail)
        .service(inspections::create_inspection)
        .service(inspections::start_inspection)
        .service(inspections::submit_inspection)
        .service(inspections::cancel_inspection)
        .service(inspections::verify_inspection)
        .service(assignments::list_assignments)
        .service(assignments::create_assignment)
        .service(assignments::edit_assignment)
        .service(assignments::set_assignment_status)
        .service(assignments::create_assignment_inspection)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::update_user)
        .service(catalogue::list_companies)
        .service(catalogue::list_equipment_types)
        .service(catalogue::list_failure_reasons)
        .service(catalogue::create_failure_reason)
        .service(catalogue::update_failure_reason)
        .service(audit_logs::list_audit_logs)
}
