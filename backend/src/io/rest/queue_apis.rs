//! # REST API for Queues
//!
//! Caller-scoped queue listing, status changes and patient search.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::info;

use super::caller::AuthenticatedCaller;
use super::error::ApiError;
use super::mappers::{AppointmentMapper, WorkloadMapper};
use crate::AppState;
use shared::{BulkConsultRequest, SearchResponse};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub fn queues_router() -> Router<AppState> {
    Router::new().route("/", get(list_queues))
}

pub fn appointments_router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_appointments))
        .route("/consulted", post(bulk_mark_consulted))
        .route("/:id/consulted", post(mark_consulted))
        .route("/:id/cancel", post(cancel_appointment))
}

/// Active queues visible to the caller
pub async fn list_queues(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
) -> impl IntoResponse {
    info!("GET /api/queues by {} ({:?})", caller.caller.account, caller.role);

    match state.queue_service.queues_for(caller.role).await {
        Ok(queues) => {
            let response = WorkloadMapper::to_queue_list_response(state.queue_service.today(), queues);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn mark_consulted(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Path(appointment_id): Path<i64>,
) -> impl IntoResponse {
    info!(
        "POST /api/appointments/{}/consulted by {}",
        appointment_id, caller.caller.account
    );

    match state.queue_service.mark_consulted(caller.role, appointment_id).await {
        Ok(appointment) => {
            let response = AppointmentMapper::to_status_change_response(appointment);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Path(appointment_id): Path<i64>,
) -> impl IntoResponse {
    info!(
        "POST /api/appointments/{}/cancel by {}",
        appointment_id, caller.caller.account
    );

    match state.queue_service.cancel(caller.role, appointment_id).await {
        Ok(appointment) => {
            let response = AppointmentMapper::to_status_change_response(appointment);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Administrator action: mark a batch of appointments consulted
pub async fn bulk_mark_consulted(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(request): Json<BulkConsultRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/appointments/consulted by {} - {} ids",
        caller.caller.account,
        request.appointment_ids.len()
    );

    match state
        .queue_service
        .bulk_mark_consulted(caller.role, &request.appointment_ids)
        .await
    {
        Ok(result) => {
            let response = AppointmentMapper::to_bulk_response(result);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn search_appointments(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    info!("GET /api/appointments/search?q={}", params.q);

    match state.queue_service.search(&params.q).await {
        Ok(results) => {
            let response = SearchResponse {
                query: params.q,
                results: AppointmentMapper::to_dto_list(results),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
