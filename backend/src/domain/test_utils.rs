//! Shared fixtures for service and handler tests.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::clock::{ClinicClock, FixedClock};
use crate::domain::commands::registration::{RegisterPatientCommand, RegistrationResult};
use crate::domain::models::department::Department;
use crate::domain::models::doctor::{Doctor, NewDoctor};
use crate::storage::{DbConnection, DepartmentRepository, DoctorRepository};
use crate::{build_state, AppState};

/// 09:00 UTC on a Monday
pub fn opening_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap()
}

/// A fresh in-memory database with every service wired to a fixed clock
pub struct TestHelper {
    pub db: DbConnection,
    pub clock: Arc<FixedClock>,
    pub state: AppState,
}

impl TestHelper {
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        Self::on_database(db, config)
    }

    /// Wire the services to an existing database, such as a file-backed pool
    pub fn on_database(db: DbConnection, config: AppConfig) -> Self {
        let clock = Arc::new(FixedClock::new(opening_time()));
        let offset = FixedOffset::east_opt(config.utc_offset_minutes * 60).unwrap();
        let clinic_clock = ClinicClock::new(clock.clone(), offset);
        let state = build_state(db.clone(), clinic_clock, &config);
        Self { db, clock, state }
    }

    pub async fn department(&self, name: &str) -> Department {
        DepartmentRepository::new(self.db.clone())
            .store_department(name)
            .await
            .expect("Failed to store department")
    }

    pub async fn doctor(&self, department: &Department, name: &str, account: Option<&str>) -> Doctor {
        let doctors = DoctorRepository::new(self.db.clone());
        let id = doctors
            .store_doctor(&NewDoctor {
                name: name.to_string(),
                department_id: department.id,
                room_number: "12".to_string(),
                account: account.map(str::to_string),
            })
            .await
            .expect("Failed to store doctor");
        doctors.get_doctor(id).await.unwrap().expect("Doctor should exist")
    }

    /// Register a patient one minute after the previous registration
    pub async fn register(
        &self,
        doctor: &Doctor,
        patient_name: &str,
        age: i64,
        is_emergency: bool,
    ) -> RegistrationResult {
        self.clock.advance(Duration::minutes(1));
        self.state
            .registration_service
            .register(RegisterPatientCommand {
                patient_name: patient_name.to_string(),
                age,
                doctor_id: Some(doctor.id),
                is_emergency,
            })
            .await
            .expect("Failed to register patient")
    }
}
