//! # MedQueue Backend
//!
//! Outpatient queue management: patient registration with per-doctor daily
//! tokens, caller-scoped queues, workload analytics and the daily PDF summary,
//! served as a JSON API.
//!
//! ```text
//! IO Layer (axum handlers, DTO mapping)
//!     ↓
//! Domain Layer (services, access policy)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{AppConfig, Branding};
use crate::domain::{
    ClinicClock, DirectoryService, ExportService, QueueService, RegistrationService,
    WorkloadService,
};
use crate::storage::{AppointmentRepository, DbConnection, DepartmentRepository, DoctorRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub directory_service: DirectoryService,
    pub registration_service: RegistrationService,
    pub queue_service: QueueService,
    pub workload_service: WorkloadService,
    pub export_service: ExportService,
    pub branding: Branding,
}

/// Wire every service to one database and one clock
pub fn build_state(db: DbConnection, clock: ClinicClock, config: &AppConfig) -> AppState {
    let departments = DepartmentRepository::new(db.clone());
    let doctors = DoctorRepository::new(db.clone());
    let appointments = AppointmentRepository::new(db);

    AppState {
        directory_service: DirectoryService::new(departments, doctors.clone()),
        registration_service: RegistrationService::new(
            appointments.clone(),
            doctors.clone(),
            clock.clone(),
            config.slot_minutes,
        ),
        queue_service: QueueService::new(appointments.clone(), doctors.clone(), clock.clone()),
        workload_service: WorkloadService::new(appointments.clone(), doctors, clock.clone()),
        export_service: ExportService::new(
            appointments,
            clock,
            config.branding.report_title.clone(),
        ),
        branding: config.branding.clone(),
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain model");
    let clock = ClinicClock::system(config.clinic_offset()?);

    Ok(build_state(db, clock, config))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Router {
    let origin = &config.cors_origin;
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);
    let cors = match origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            cors
        }
    };

    Router::new()
        .nest("/api", io::rest::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
