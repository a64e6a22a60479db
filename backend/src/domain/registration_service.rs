//! # Patient Registration
//!
//! Registers a walk-in patient with a doctor. The appointment receives the
//! next token of that doctor's clinic day and a one-time estimate of when the
//! consultation will start: `now + slot * (patients still pending ahead)`.
//! The estimate is stored with the appointment and never recomputed.

use chrono::Duration;
use tracing::{info, warn};

use crate::domain::clock::ClinicClock;
use crate::domain::commands::registration::{RegisterPatientCommand, RegistrationResult};
use crate::domain::errors::{QueueError, QueueResult};
use crate::domain::models::appointment::AppointmentDraft;
use crate::storage::{AppointmentRepository, DoctorRepository};

const MAX_PATIENT_NAME_LEN: usize = 200;
const MAX_PATIENT_AGE: i64 = 150;

#[derive(Clone)]
pub struct RegistrationService {
    appointments: AppointmentRepository,
    doctors: DoctorRepository,
    clock: ClinicClock,
    slot_minutes: u32,
}

impl RegistrationService {
    pub fn new(
        appointments: AppointmentRepository,
        doctors: DoctorRepository,
        clock: ClinicClock,
        slot_minutes: u32,
    ) -> Self {
        Self {
            appointments,
            doctors,
            clock,
            slot_minutes,
        }
    }

    /// Register a patient and assign their token
    pub async fn register(&self, command: RegisterPatientCommand) -> QueueResult<RegistrationResult> {
        info!(
            "Registering patient for doctor {:?} (emergency: {})",
            command.doctor_id, command.is_emergency
        );

        let doctor_id = command.doctor_id.ok_or_else(|| {
            QueueError::Validation("Please select a department and a doctor.".to_string())
        })?;
        let patient_name = validate_patient_name(&command.patient_name)?;
        let age = validate_age(command.age)?;

        let doctor = match self.doctors.get_doctor(doctor_id).await? {
            Some(doctor) => doctor,
            None => {
                warn!("Registration for unknown doctor {}", doctor_id);
                return Err(QueueError::not_found("Doctor", doctor_id));
            }
        };

        let now = self.clock.now();
        let draft = AppointmentDraft {
            patient_name,
            age,
            doctor_id: doctor.id,
            is_emergency: command.is_emergency,
            registration_time: now,
            registration_day: self.clock.day_of(now),
        };

        let slot = i64::from(self.slot_minutes);
        let mut estimated_wait_minutes = 0;
        let appointment = self
            .appointments
            .insert_with_next_token(&draft, |pending_ahead| {
                estimated_wait_minutes = slot * i64::from(pending_ahead);
                now + Duration::minutes(estimated_wait_minutes)
            })
            .await?;

        info!(
            "Registered appointment {} with token {} for Dr. {} (wait {} min)",
            appointment.id, appointment.token_number, doctor.name, estimated_wait_minutes
        );

        Ok(RegistrationResult {
            appointment,
            estimated_wait_minutes,
        })
    }
}

fn validate_patient_name(name: &str) -> QueueResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(QueueError::Validation("Patient name cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_PATIENT_NAME_LEN {
        return Err(QueueError::Validation(format!(
            "Patient name cannot exceed {} characters",
            MAX_PATIENT_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_age(age: i64) -> QueueResult<u32> {
    if !(0..=MAX_PATIENT_AGE).contains(&age) {
        return Err(QueueError::Validation(format!(
            "Patient age must be between 0 and {}",
            MAX_PATIENT_AGE
        )));
    }
    Ok(age as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::domain::access::CallerRole;
    use crate::domain::models::appointment::AppointmentStatus;
    use crate::domain::test_utils::{opening_time, TestHelper};

    fn command(doctor_id: Option<i64>, name: &str, age: i64) -> RegisterPatientCommand {
        RegisterPatientCommand {
            patient_name: name.to_string(),
            age,
            doctor_id,
            is_emergency: false,
        }
    }

    #[tokio::test]
    async fn test_walk_in_morning() {
        let helper = TestHelper::new().await;
        let dep = helper.department("General Medicine").await;
        let doctor = helper.doctor(&dep, "Rao", Some("dr.rao")).await;

        let asha = helper.register(&doctor, "Asha", 30, false).await;
        assert_eq!(asha.appointment.token_number, 1);
        assert_eq!(asha.estimated_wait_minutes, 0);
        assert_eq!(asha.appointment.estimated_time, asha.appointment.registration_time);

        let ravi = helper.register(&doctor, "Ravi", 45, false).await;
        assert_eq!(ravi.appointment.token_number, 2);
        assert_eq!(ravi.estimated_wait_minutes, 15);
        assert_eq!(
            ravi.appointment.estimated_time,
            ravi.appointment.registration_time + Duration::minutes(15)
        );

        let sam = helper.register(&doctor, "Sam", 60, true).await;
        assert_eq!(sam.appointment.token_number, 3);

        let queue_service = &helper.state.queue_service;
        let names = |queue: Vec<crate::domain::models::appointment::Appointment>| {
            queue.into_iter().map(|a| a.patient_name).collect::<Vec<_>>()
        };
        assert_eq!(
            names(queue_service.active_queue(doctor.id).await.unwrap()),
            vec!["Sam", "Asha", "Ravi"]
        );

        queue_service
            .mark_consulted(CallerRole::Doctor(doctor.id), asha.appointment.id)
            .await
            .expect("Owner should be able to mark consulted");
        assert_eq!(
            names(queue_service.active_queue(doctor.id).await.unwrap()),
            vec!["Sam", "Ravi"]
        );

        let report = helper
            .state
            .workload_service
            .analytics(CallerRole::Administrator)
            .await
            .unwrap();
        assert_eq!(report.doctors[0].appointments.len(), 2);
    }

    #[tokio::test]
    async fn test_new_registration_is_pending() {
        let helper = TestHelper::new().await;
        let dep = helper.department("ENT").await;
        let doctor = helper.doctor(&dep, "Iyer", None).await;

        let result = helper.register(&doctor, "  Meena  ", 12, false).await;

        assert_eq!(result.appointment.status, AppointmentStatus::Pending);
        assert_eq!(result.appointment.patient_name, "Meena");
        assert_eq!(result.appointment.doctor_name, "Iyer");
        assert_eq!(result.appointment.registration_day, opening_time().date_naive());
    }

    #[tokio::test]
    async fn test_tokens_restart_each_day_and_doctor() {
        let helper = TestHelper::new().await;
        let dep = helper.department("ENT").await;
        let first = helper.doctor(&dep, "Iyer", None).await;
        let second = helper.doctor(&dep, "Khan", None).await;

        assert_eq!(helper.register(&first, "A", 20, false).await.appointment.token_number, 1);
        assert_eq!(helper.register(&first, "B", 20, false).await.appointment.token_number, 2);
        assert_eq!(helper.register(&second, "C", 20, false).await.appointment.token_number, 1);

        helper.clock.advance(Duration::days(1));
        let next_day = helper.register(&first, "D", 20, false).await;
        assert_eq!(next_day.appointment.token_number, 1);
        assert_eq!(next_day.estimated_wait_minutes, 0);
    }

    #[tokio::test]
    async fn test_estimate_ignores_patients_already_seen() {
        let helper = TestHelper::new().await;
        let dep = helper.department("ENT").await;
        let doctor = helper.doctor(&dep, "Iyer", None).await;

        let first = helper.register(&doctor, "A", 20, false).await;
        helper.register(&doctor, "B", 20, false).await;
        helper
            .state
            .queue_service
            .mark_consulted(CallerRole::Administrator, first.appointment.id)
            .await
            .unwrap();

        let third = helper.register(&doctor, "C", 20, false).await;
        assert_eq!(third.appointment.token_number, 3);
        assert_eq!(third.estimated_wait_minutes, 15);
    }

    #[tokio::test]
    async fn test_slot_length_comes_from_config() {
        let config = AppConfig {
            slot_minutes: 10,
            ..AppConfig::default()
        };
        let helper = TestHelper::with_config(config).await;
        let dep = helper.department("ENT").await;
        let doctor = helper.doctor(&dep, "Iyer", None).await;

        helper.register(&doctor, "A", 20, false).await;
        helper.register(&doctor, "B", 20, false).await;
        let third = helper.register(&doctor, "C", 20, false).await;

        assert_eq!(third.estimated_wait_minutes, 20);
    }

    #[tokio::test]
    async fn test_clinic_day_follows_offset() {
        let config = AppConfig {
            utc_offset_minutes: 330,
            ..AppConfig::default()
        };
        let helper = TestHelper::with_config(config).await;
        let dep = helper.department("ENT").await;
        let doctor = helper.doctor(&dep, "Iyer", None).await;

        // 18:29 UTC is still the same day, 18:31 UTC is past midnight at UTC+05:30
        helper.clock.set(opening_time() + Duration::hours(9) + Duration::minutes(28));
        let late = helper.register(&doctor, "Late", 20, false).await;
        helper.clock.advance(Duration::minutes(1));
        let after_midnight = helper.register(&doctor, "Early", 20, false).await;

        assert_eq!(late.appointment.token_number, 1);
        assert_eq!(after_midnight.appointment.token_number, 1);
        assert_eq!(
            after_midnight.appointment.registration_day,
            late.appointment.registration_day.succ_opt().unwrap()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_parallel_registrations_get_distinct_tokens() {
        const PATIENTS: u32 = 40;

        let dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite:{}", dir.path().join("opd.db").display());
        let db = crate::storage::DbConnection::new(&url).await.unwrap();
        let helper = TestHelper::on_database(db, AppConfig::default());
        let dep = helper.department("ENT").await;
        let doctor_id = helper.doctor(&dep, "Iyer", None).await.id;

        let handles: Vec<_> = (0..PATIENTS)
            .map(|i| {
                let service = helper.state.registration_service.clone();
                tokio::spawn(async move {
                    service
                        .register(command(Some(doctor_id), &format!("Patient {}", i), 30))
                        .await
                })
            })
            .collect();

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().expect("Parallel registration failed"));
        }

        let mut tokens: Vec<u32> = results.iter().map(|r| r.appointment.token_number).collect();
        tokens.sort_unstable();
        assert_eq!(tokens, (1..=PATIENTS).collect::<Vec<_>>());

        // Everyone registered earlier is still pending, so the estimate follows the token
        for result in &results {
            assert_eq!(
                result.estimated_wait_minutes,
                15 * i64::from(result.appointment.token_number - 1)
            );
        }
    }

    #[tokio::test]
    async fn test_missing_doctor_is_rejected() {
        let helper = TestHelper::new().await;
        let result = helper
            .state
            .registration_service
            .register(command(None, "Asha", 30))
            .await;

        match result {
            Err(QueueError::Validation(message)) => {
                assert_eq!(message, "Please select a department and a doctor.")
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_doctor_is_not_found() {
        let helper = TestHelper::new().await;
        let result = helper
            .state
            .registration_service
            .register(command(Some(42), "Asha", 30))
            .await;

        assert!(matches!(result, Err(QueueError::NotFound { entity: "Doctor", id: 42 })));
    }

    #[tokio::test]
    async fn test_invalid_patient_details() {
        let helper = TestHelper::new().await;
        let dep = helper.department("ENT").await;
        let doctor = helper.doctor(&dep, "Iyer", None).await;
        let service = &helper.state.registration_service;

        for bad in [
            command(Some(doctor.id), "   ", 30),
            command(Some(doctor.id), &"x".repeat(201), 30),
            command(Some(doctor.id), "Asha", -1),
            command(Some(doctor.id), "Asha", 151),
        ] {
            assert!(matches!(service.register(bad).await, Err(QueueError::Validation(_))));
        }

        let oldest = service.register(command(Some(doctor.id), "Asha", 150)).await.unwrap();
        assert_eq!(oldest.appointment.age, 150);
        assert_eq!(oldest.appointment.token_number, 1);
    }
}
