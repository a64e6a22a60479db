//! # Workload Analytics
//!
//! Per-doctor and per-department load for the current clinic day, plus the
//! headline numbers shown on the dashboard.

use tracing::info;

use crate::domain::access::{authorize_admin, CallerRole};
use crate::domain::clock::ClinicClock;
use crate::domain::errors::QueueResult;
use crate::domain::models::appointment::AppointmentStatus;
use crate::domain::models::workload::{DashboardStats, DoctorQueue, WorkloadReport};
use crate::storage::{AppointmentRepository, DoctorRepository};

#[derive(Clone)]
pub struct WorkloadService {
    appointments: AppointmentRepository,
    doctors: DoctorRepository,
    clock: ClinicClock,
}

impl WorkloadService {
    pub fn new(appointments: AppointmentRepository, doctors: DoctorRepository, clock: ClinicClock) -> Self {
        Self {
            appointments,
            doctors,
            clock,
        }
    }

    /// Today's workload. Administrators only.
    pub async fn analytics(&self, role: CallerRole) -> QueueResult<WorkloadReport> {
        authorize_admin(role).require("Workload analytics are restricted to administrators")?;

        let day = self.clock.today();
        let mut doctors = Vec::new();
        for doctor in self.doctors.list_doctors(None).await? {
            let appointments = self.appointments.list_active_for_doctor(doctor.id, day).await?;
            doctors.push(DoctorQueue { doctor, appointments });
        }
        let departments = self.appointments.department_counts(day).await?;

        info!(
            "Workload for {}: {} doctors, {} departments",
            day,
            doctors.len(),
            departments.len()
        );
        Ok(WorkloadReport {
            day,
            doctors,
            departments,
        })
    }

    pub async fn dashboard(&self) -> QueueResult<DashboardStats> {
        let day = self.clock.today();
        let stats = DashboardStats {
            day,
            total_pending: self.appointments.count_for_day(day, AppointmentStatus::Pending).await?,
            total_consulted: self.appointments.count_for_day(day, AppointmentStatus::Consulted).await?,
            doctors_count: self.doctors.count_doctors().await?,
        };
        info!("Dashboard for {}: {:?}", day, stats);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::QueueError;
    use crate::domain::test_utils::TestHelper;
    use chrono::Duration;

    #[tokio::test]
    async fn test_analytics_requires_admin() {
        let helper = TestHelper::new().await;
        let dep = helper.department("ENT").await;
        let doctor = helper.doctor(&dep, "Iyer", Some("iyer")).await;

        for role in [CallerRole::Doctor(doctor.id), CallerRole::Staff] {
            assert!(matches!(
                helper.state.workload_service.analytics(role).await,
                Err(QueueError::Forbidden(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_department_counts_add_up() {
        let helper = TestHelper::new().await;
        let cardio = helper.department("Cardiology").await;
        let ent = helper.department("ENT").await;
        let ortho = helper.department("Orthopaedics").await;
        let mehta = helper.doctor(&cardio, "Mehta", None).await;
        let iyer = helper.doctor(&ent, "Iyer", None).await;
        let queue = &helper.state.queue_service;

        let a = helper.register(&mehta, "A", 20, false).await.appointment;
        let b = helper.register(&mehta, "B", 20, false).await.appointment;
        helper.register(&iyer, "C", 20, false).await;
        helper.register(&iyer, "D", 20, false).await;
        helper.register(&iyer, "E", 20, true).await;
        queue.mark_consulted(CallerRole::Administrator, a.id).await.unwrap();
        queue.cancel(CallerRole::Administrator, b.id).await.unwrap();

        let report = helper
            .state
            .workload_service
            .analytics(CallerRole::Administrator)
            .await
            .unwrap();

        let order: Vec<i64> = report.departments.iter().map(|d| d.department_id).collect();
        assert_eq!(order, vec![ent.id, cardio.id, ortho.id]);

        let cardio_counts = &report.departments[1];
        assert_eq!(cardio_counts.pending_count, 0);
        assert_eq!(cardio_counts.consulted_count, 1);
        assert_eq!(cardio_counts.cancelled_count, 1);
        assert_eq!(
            cardio_counts.pending_count + cardio_counts.consulted_count + cardio_counts.cancelled_count,
            2
        );

        let ortho_counts = &report.departments[2];
        assert_eq!(ortho_counts.pending_count + ortho_counts.consulted_count, 0);

        assert_eq!(report.doctors.len(), 2);
        assert!(report.doctors[0].appointments.is_empty());
        let iyer_queue: Vec<&str> = report.doctors[1]
            .appointments
            .iter()
            .map(|a| a.patient_name.as_str())
            .collect();
        assert_eq!(iyer_queue, vec!["E", "C", "D"]);
    }

    #[tokio::test]
    async fn test_analytics_only_counts_today() {
        let helper = TestHelper::new().await;
        let dep = helper.department("ENT").await;
        let doctor = helper.doctor(&dep, "Iyer", None).await;

        helper.register(&doctor, "Yesterday", 20, false).await;
        helper.clock.advance(Duration::days(1));
        helper.register(&doctor, "Today", 20, false).await;

        let report = helper
            .state
            .workload_service
            .analytics(CallerRole::Administrator)
            .await
            .unwrap();
        assert_eq!(report.day, helper.state.queue_service.today());
        assert_eq!(report.departments[0].pending_count, 1);
        assert_eq!(report.doctors[0].appointments.len(), 1);
    }

    #[tokio::test]
    async fn test_dashboard_totals() {
        let helper = TestHelper::new().await;
        let dep = helper.department("ENT").await;
        let iyer = helper.doctor(&dep, "Iyer", None).await;
        helper.doctor(&dep, "Khan", None).await;

        let first = helper.register(&iyer, "A", 20, false).await.appointment;
        helper.register(&iyer, "B", 20, false).await;
        helper.register(&iyer, "C", 20, false).await;
        helper
            .state
            .queue_service
            .mark_consulted(CallerRole::Administrator, first.id)
            .await
            .unwrap();

        let stats = helper.state.workload_service.dashboard().await.unwrap();
        assert_eq!(stats.total_pending, 2);
        assert_eq!(stats.total_consulted, 1);
        assert_eq!(stats.doctors_count, 2);
    }
}
