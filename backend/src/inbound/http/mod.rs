//! HTTP inbound adapter exposing REST endpoints.

pub mod audit_logs;
pub mod assignments;
pub mod catalogue;
pub mod error;
pub mod inspections;
pub mod pov;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod vehicles;

pub use error::ApiResult;
pub use state::AppState;
