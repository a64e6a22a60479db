//! # REST API Interface Layer
//!
//! JSON endpoints under `/api`. Every endpoint except `/api/site` needs the
//! caller identity headers (see [`caller`]); domain failures are translated to
//! status codes in [`error`].

pub mod analytics_apis;
pub mod appointment_apis;
pub mod caller;
pub mod directory_apis;
pub mod error;
pub mod export_apis;
pub mod mappers;
pub mod queue_apis;
pub mod site_apis;

use axum::Router;

use crate::AppState;

/// All API routes, relative to `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/site", site_apis::router())
        .nest("/dashboard", analytics_apis::dashboard_router())
        .nest("/analytics", analytics_apis::analytics_router())
        .nest("/departments", directory_apis::departments_router())
        .nest("/doctors", directory_apis::doctors_router())
        .nest(
            "/appointments",
            appointment_apis::router().merge(queue_apis::appointments_router()),
        )
        .nest("/queues", queue_apis::queues_router())
        .nest("/export", export_apis::router())
}
