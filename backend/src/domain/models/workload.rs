use chrono::NaiveDate;

use super::appointment::Appointment;
use super::doctor::Doctor;

/// A doctor together with their ordered active queue
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorQueue {
    pub doctor: Doctor,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentWorkload {
    pub department_id: i64,
    pub department_name: String,
    pub pending_count: i64,
    pub consulted_count: i64,
    pub cancelled_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadReport {
    pub day: NaiveDate,
    /// Active queues, consulted patients excluded
    pub doctors: Vec<DoctorQueue>,
    /// Ordered by pending count, busiest first
    pub departments: Vec<DepartmentWorkload>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub day: NaiveDate,
    pub total_pending: i64,
    pub total_consulted: i64,
    pub doctors_count: i64,
}

/// Contents of the daily summary document
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub day: NaiveDate,
    pub total_count: usize,
    pub emergency_count: usize,
    pub consulted_count: usize,
    /// Every appointment registered on `day`, oldest first
    pub rows: Vec<Appointment>,
}
