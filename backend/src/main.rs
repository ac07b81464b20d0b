//! Backend entry-point: wires REST endpoints, persistence, and OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use actix_web::{web, App, HttpServer};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use fleetgate::doc::ApiDoc;
use fleetgate::domain::{
    AssignmentService, AuditService, FleetService, InspectionService, UserService,
};
use fleetgate::inbound::http::AppState;
use fleetgate::outbound::persistence::{
    DbPool, DieselAssignmentRepository, DieselAuditLogRepository, DieselCatalogueRepository,
    DieselFailureReasonRepository, DieselInspectionRepository, DieselUserRepository,
    DieselVehicleRepository, PoolConfig,
};
use fleetgate::server::{api_scope, session_middleware, ServerConfig};

fn load_session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn build_state(pool: DbPool) -> AppState {
    let vehicles = Arc::new(DieselVehicleRepository::new(pool.clone()));
    let inspections = Arc::new(DieselInspectionRepository::new(pool.clone()));
    let assignments = Arc::new(DieselAssignmentRepository::new(pool.clone()));
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let catalogue = Arc::new(DieselCatalogueRepository::new(pool.clone()));
    let failure_reasons = Arc::new(DieselFailureReasonRepository::new(pool.clone()));
    let audit = Arc::new(DieselAuditLogRepository::new(pool));

    AppState {
        fleet: FleetService::new(vehicles, audit.clone()),
        inspections: InspectionService::new(inspections.clone(), audit.clone()),
        assignments: AssignmentService::new(assignments, inspections, audit.clone()),
        users: UserService::new(users, audit.clone()),
        audit: AuditService::new(audit),
        catalogue,
        failure_reasons,
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key = load_session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let state = web::Data::new(build_state(pool));
    let config = ServerConfig::new(
        key,
        cookie_secure,
        SameSite::Lax,
        ([0, 0, 0, 0], 8080).into(),
    );
    let bind_addr = config.bind_addr();

    HttpServer::new(move || {
        let app = App::new().service(api_scope(state.clone(), session_middleware(&config)));
        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
        app
    })
    .bind(bind_addr)?
    .run()
    .await
}
