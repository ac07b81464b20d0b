//! Fleetgate backend library modules.
//!
//! Role-based fleet inspection backend. The domain layer holds the
//! visibility policy (masking, effective roles) and the lifecycle policy
//! (vehicle, inspection, and assignment state machines); inbound and
//! outbound adapters translate HTTP and PostgreSQL at the edges.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
