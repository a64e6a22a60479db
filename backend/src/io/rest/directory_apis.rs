//! # REST API for Departments and Doctors

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use tracing::info;

use super::caller::AuthenticatedCaller;
use super::error::ApiError;
use super::mappers::{DepartmentMapper, DoctorMapper};
use crate::domain::commands::directory::{CreateDepartmentCommand, CreateDoctorCommand};
use crate::AppState;
use shared::{CreateDepartmentRequest, CreateDoctorRequest, DepartmentListResponse, DoctorListResponse};

#[derive(Debug, Deserialize)]
pub struct DoctorFilter {
    pub department_id: Option<i64>,
}

pub fn departments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route("/:id", delete(delete_department))
}

pub fn doctors_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_doctors).post(create_doctor))
        .route("/:id", delete(delete_doctor))
}

pub async fn list_departments(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
) -> impl IntoResponse {
    info!("GET /api/departments");

    match state.directory_service.list_departments().await {
        Ok(departments) => {
            let response = DepartmentListResponse {
                departments: DepartmentMapper::to_dto_list(departments),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn create_department(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(request): Json<CreateDepartmentRequest>,
) -> impl IntoResponse {
    info!("POST /api/departments by {} - {:?}", caller.caller.account, request);

    let command = CreateDepartmentCommand { name: request.name };
    match state.directory_service.create_department(caller.role, command).await {
        Ok(department) => {
            (StatusCode::CREATED, Json(DepartmentMapper::to_dto(department))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn delete_department(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Path(department_id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/departments/{} by {}", department_id, caller.caller.account);

    match state.directory_service.delete_department(caller.role, department_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn list_doctors(
    State(state): State<AppState>,
    _caller: AuthenticatedCaller,
    Query(filter): Query<DoctorFilter>,
) -> impl IntoResponse {
    info!("GET /api/doctors - {:?}", filter);

    match state.directory_service.list_doctors(filter.department_id).await {
        Ok(doctors) => {
            let response = DoctorListResponse {
                doctors: DoctorMapper::to_dto_list(doctors),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn create_doctor(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Json(request): Json<CreateDoctorRequest>,
) -> impl IntoResponse {
    info!("POST /api/doctors by {} - {:?}", caller.caller.account, request);

    let command = CreateDoctorCommand {
        name: request.name,
        department_id: request.department_id,
        room_number: request.room_number,
        account: request.account,
    };
    match state.directory_service.create_doctor(caller.role, command).await {
        Ok(doctor) => (StatusCode::CREATED, Json(DoctorMapper::to_dto(doctor))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn delete_doctor(
    State(state): State<AppState>,
    caller: AuthenticatedCaller,
    Path(doctor_id): Path<i64>,
) -> impl IntoResponse {
    info!("DELETE /api/doctors/{} by {}", doctor_id, caller.caller.account);

    match state.directory_service.delete_doctor(caller.role, doctor_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
