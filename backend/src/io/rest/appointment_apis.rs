//! # REST API for Patient Registration

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use tracing::info;

use super::caller::AuthenticatedCaller;
use super::error::ApiError;
use super::mappers::AppointmentMapper;
use crate::domain::commands::registration::RegisterPatientCommand;
use crate::AppState;
use shared::CreateAppointmentRequest;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(register_patient))
}

/// Register a patient and hand out their token
pub async fn register_patient(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(request): Json<CreateAppointmentRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/appointments by {} - doctor {:?}",
        caller.caller.account, request.doctor_id
    );

    let command = RegisterPatientCommand {
        patient_name: request.patient_name,
        age: request.age,
        doctor_id: request.doctor_id,
        is_emergency: request.is_emergency,
    };

    match state.registration_service.register(command).await {
        Ok(result) => {
            let response = AppointmentMapper::to_registration_response(result);
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
