//! # Queue Service
//!
//! Active queues, status changes and patient search.
//!
//! A doctor's active queue holds the appointments registered with them on the
//! current clinic day that are still Pending, emergencies first and then in
//! order of arrival. An appointment that leaves Pending never comes back, so
//! consulted and cancelled patients drop out of every later queue view.

use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{info, warn};

use crate::domain::access::{
    authorize_admin, authorize_status_change, queue_scope, CallerRole, QueueScope,
};
use crate::domain::clock::ClinicClock;
use crate::domain::commands::queue::BulkConsultResult;
use crate::domain::errors::{QueueError, QueueResult};
use crate::domain::models::appointment::{Appointment, AppointmentStatus};
use crate::domain::models::workload::DoctorQueue;
use crate::storage::{AppointmentRepository, DoctorRepository};

#[derive(Clone)]
pub struct QueueService {
    appointments: AppointmentRepository,
    doctors: DoctorRepository,
    clock: ClinicClock,
}

impl QueueService {
    pub fn new(appointments: AppointmentRepository, doctors: DoctorRepository, clock: ClinicClock) -> Self {
        Self {
            appointments,
            doctors,
            clock,
        }
    }

    /// The clinic day queues are computed for
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Today's Pending appointments for one doctor, emergencies first
    pub async fn active_queue(&self, doctor_id: i64) -> QueueResult<Vec<Appointment>> {
        let queue = self
            .appointments
            .list_active_for_doctor(doctor_id, self.clock.today())
            .await?;
        Ok(queue)
    }

    /// The queues the caller is allowed to see, one entry per doctor by id.
    /// Doctors with nobody waiting are included with an empty queue.
    pub async fn queues_for(&self, role: CallerRole) -> QueueResult<Vec<DoctorQueue>> {
        let doctors = match queue_scope(role) {
            QueueScope::AllDoctors => self.doctors.list_doctors(None).await?,
            QueueScope::SingleDoctor(doctor_id) => {
                self.doctors.get_doctor(doctor_id).await?.into_iter().collect()
            }
        };

        let mut queues = Vec::with_capacity(doctors.len());
        for doctor in doctors {
            let appointments = self.active_queue(doctor.id).await?;
            queues.push(DoctorQueue { doctor, appointments });
        }

        info!("Listed {} queues for {:?}", queues.len(), role);
        Ok(queues)
    }

    pub async fn mark_consulted(&self, role: CallerRole, appointment_id: i64) -> QueueResult<Appointment> {
        self.change_status(role, appointment_id, AppointmentStatus::Consulted).await
    }

    pub async fn cancel(&self, role: CallerRole, appointment_id: i64) -> QueueResult<Appointment> {
        self.change_status(role, appointment_id, AppointmentStatus::Cancelled).await
    }

    async fn change_status(
        &self,
        role: CallerRole,
        appointment_id: i64,
        target: AppointmentStatus,
    ) -> QueueResult<Appointment> {
        let appointment = self
            .appointments
            .get_appointment(appointment_id)
            .await?
            .ok_or_else(|| QueueError::not_found("Appointment", appointment_id))?;

        authorize_status_change(role, appointment.doctor_id)
            .require("Only the assigned doctor or an administrator can update this appointment")
            .map_err(|e| {
                warn!("{:?} refused status change on appointment {}", role, appointment_id);
                e
            })?;

        if appointment.status == target {
            info!("Appointment {} is already {}", appointment_id, target);
            return Ok(appointment);
        }
        if !appointment.status.can_transition_to(target) {
            return Err(QueueError::InvalidTransition {
                from: appointment.status,
                to: target,
            });
        }

        // Only a Pending appointment can move, so a concurrent change shows up here
        let changed = self
            .appointments
            .update_pending_status(&[appointment_id], target)
            .await?;
        if changed.is_empty() {
            let current = self
                .appointments
                .get_appointment(appointment_id)
                .await?
                .ok_or_else(|| QueueError::not_found("Appointment", appointment_id))?;
            if current.status == target {
                return Ok(current);
            }
            return Err(QueueError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }

        info!(
            "Appointment {} (token {}) moved from {} to {}",
            appointment_id, appointment.token_number, appointment.status, target
        );
        Ok(Appointment {
            status: target,
            ..appointment
        })
    }

    /// Mark several appointments consulted at once. Unknown ids and
    /// appointments that are no longer Pending are reported, not failed.
    pub async fn bulk_mark_consulted(
        &self,
        role: CallerRole,
        appointment_ids: &[i64],
    ) -> QueueResult<BulkConsultResult> {
        authorize_admin(role).require("Only administrators can update appointments in bulk")?;

        let mut result = BulkConsultResult::default();
        let mut seen = HashSet::new();
        let mut pending = Vec::new();

        for &id in appointment_ids {
            if !seen.insert(id) {
                continue;
            }
            match self.appointments.get_appointment(id).await? {
                None => result.not_found_ids.push(id),
                Some(appointment) if appointment.status == AppointmentStatus::Pending => pending.push(id),
                Some(_) => result.skipped_ids.push(id),
            }
        }

        let consulted = self
            .appointments
            .update_pending_status(&pending, AppointmentStatus::Consulted)
            .await?;
        for id in pending {
            if !consulted.contains(&id) {
                result.skipped_ids.push(id);
            }
        }
        result.consulted_ids = consulted;

        info!(
            "Bulk consult: {} updated, {} not found, {} skipped",
            result.consulted_ids.len(),
            result.not_found_ids.len(),
            result.skipped_ids.len()
        );
        Ok(result)
    }

    /// Case-insensitive name search, or exact token search when the query is
    /// a number. Covers every day and status, newest first.
    pub async fn search(&self, query: &str) -> QueueResult<Vec<Appointment>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let token = query.parse::<u32>().ok();
        let results = self.appointments.search(query, token).await?;
        info!("Search {:?} matched {} appointments", query, results.len());
        Ok(results)
    }
}
