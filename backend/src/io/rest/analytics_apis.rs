//! # REST API for Dashboard and Analytics

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Redirect},
    routing::get,
    Router,
};
use tracing::info;

use super::caller::AuthenticatedCaller;
use super::error::ApiError;
use super::mappers::WorkloadMapper;
use crate::AppState;

pub fn dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

pub fn analytics_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_analytics))
        .route("/departments", get(department_analytics))
}

/// Today's headline numbers
pub async fn get_dashboard(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
) -> impl IntoResponse {
    info!("GET /api/dashboard by {}", caller.caller.account);

    match state.workload_service.dashboard().await {
        Ok(stats) => {
            let response = WorkloadMapper::to_dashboard_response(stats);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Per-doctor and per-department workload for today
pub async fn get_analytics(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
) -> impl IntoResponse {
    info!("GET /api/analytics by {}", caller.caller.account);

    match state.workload_service.analytics(caller.role).await {
        Ok(report) => {
            let response = WorkloadMapper::to_analytics_response(report);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Department counts are part of the main analytics report
pub async fn department_analytics() -> Redirect {
    Redirect::to("/api/analytics")
}
