//! # REST API for Data Export
//!
//! The daily OPD summary as a downloadable PDF.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::info;

use super::caller::AuthenticatedCaller;
use super::error::ApiError;
use crate::domain::export_service::SUMMARY_FILE_NAME;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/daily-summary", get(export_daily_summary))
}

pub async fn export_daily_summary(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
) -> impl IntoResponse {
    info!("GET /api/export/daily-summary by {}", caller.caller.account);

    match state.export_service.export_daily_summary(caller.role).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", SUMMARY_FILE_NAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
