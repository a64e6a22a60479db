use chrono::NaiveDate;
use shared::{
    AnalyticsResponse, DashboardResponse, DepartmentWorkload, DoctorQueue, DoctorWorkload,
    QueueListResponse,
};

use super::{format_date, AppointmentMapper, DoctorMapper};
use crate::domain::models::workload::{
    DashboardStats, DepartmentWorkload as DomainDepartmentWorkload, DoctorQueue as DomainDoctorQueue,
    WorkloadReport,
};

pub struct WorkloadMapper;

impl WorkloadMapper {
    pub fn queue_to_dto(domain: DomainDoctorQueue) -> DoctorQueue {
        DoctorQueue {
            doctor: DoctorMapper::to_dto(domain.doctor),
            appointments: AppointmentMapper::to_dto_list(domain.appointments),
        }
    }

    pub fn to_queue_list_response(day: NaiveDate, queues: Vec<DomainDoctorQueue>) -> QueueListResponse {
        QueueListResponse {
            date: format_date(day),
            queues: queues.into_iter().map(Self::queue_to_dto).collect(),
        }
    }

    pub fn doctor_workload_to_dto(domain: DomainDoctorQueue) -> DoctorWorkload {
        DoctorWorkload {
            doctor_id: domain.doctor.id,
            doctor_name: domain.doctor.name,
            department_name: domain.doctor.department_name,
            total_patients: domain.appointments.len(),
            patient_list: AppointmentMapper::to_dto_list(domain.appointments),
        }
    }

    pub fn department_workload_to_dto(domain: DomainDepartmentWorkload) -> DepartmentWorkload {
        DepartmentWorkload {
            department_id: domain.department_id,
            department_name: domain.department_name,
            pending_count: domain.pending_count,
            consulted_count: domain.consulted_count,
            cancelled_count: domain.cancelled_count,
        }
    }

    pub fn to_analytics_response(report: WorkloadReport) -> AnalyticsResponse {
        AnalyticsResponse {
            date: format_date(report.day),
            workload: report
                .doctors
                .into_iter()
                .map(Self::doctor_workload_to_dto)
                .collect(),
            dept_workload: report
                .departments
                .into_iter()
                .map(Self::department_workload_to_dto)
                .collect(),
        }
    }

    pub fn to_dashboard_response(stats: DashboardStats) -> DashboardResponse {
        DashboardResponse {
            date: format_date(stats.day),
            total_pending: stats.total_pending,
            total_consulted: stats.total_consulted,
            doctors_count: stats.doctors_count,
        }
    }
}
