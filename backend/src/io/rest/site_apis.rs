use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::AppState;
use shared::SiteInfoResponse;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_site_info))
}

/// Branding labels for the administration UI. No identity needed.
pub async fn get_site_info(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/site");

    let branding = &state.branding;
    let response = SiteInfoResponse {
        site_header: branding.site_header.clone(),
        site_title: branding.site_title.clone(),
        index_title: branding.index_title.clone(),
    };
    (StatusCode::OK, Json(response))
}
