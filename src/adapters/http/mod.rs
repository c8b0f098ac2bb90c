//! HTTP adapter - the server boundary in front of the assistant service.
//!
//! Credentials stay on the server; clients only see use cases, template
//! names, results and exports.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::{ApiError, AppState};
pub use routes::{api_routes, app_router};
