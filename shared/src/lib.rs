use serde::{Deserialize, Serialize};
use std::fmt;

/// Consultation status of an appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Consulted,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Consulted => "Consulted",
            AppointmentStatus::Cancelled => "Cancelled",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub department_id: i64,
    pub department_name: String,
    pub room_number: String,
    /// Login account linked to this doctor, if any
    pub account: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_name: String,
    pub age: u32,
    pub doctor_id: i64,
    pub doctor_name: String,
    /// Sequential token within the doctor's day
    pub token_number: u32,
    pub is_emergency: bool,
    pub status: AppointmentStatus,
    /// RFC 3339 timestamp of registration
    pub registration_time: String,
    /// RFC 3339 timestamp estimated at registration, never revised
    pub estimated_time: String,
}

/// Request to register a patient against a doctor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_name: String,
    pub age: i64,
    /// Missing when no doctor was selected on the registration form
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub is_emergency: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppointmentResponse {
    pub appointment: Appointment,
    pub token_number: u32,
    pub estimated_time: String,
    pub estimated_wait_minutes: i64,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorQueue {
    pub doctor: Doctor,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueListResponse {
    pub date: String,
    pub queues: Vec<DoctorQueue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<Appointment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChangeResponse {
    pub appointment: Appointment,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkConsultRequest {
    pub appointment_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkConsultResponse {
    pub consulted_ids: Vec<i64>,
    pub not_found_ids: Vec<i64>,
    /// Appointments left untouched because they were no longer Pending
    pub skipped_ids: Vec<i64>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorWorkload {
    pub doctor_id: i64,
    pub doctor_name: String,
    pub department_name: String,
    pub total_patients: usize,
    pub patient_list: Vec<Appointment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentWorkload {
    pub department_id: i64,
    pub department_name: String,
    pub pending_count: i64,
    pub consulted_count: i64,
    pub cancelled_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub date: String,
    pub workload: Vec<DoctorWorkload>,
    pub dept_workload: Vec<DepartmentWorkload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub date: String,
    pub total_pending: i64,
    pub total_consulted: i64,
    pub doctors_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentListResponse {
    pub departments: Vec<Department>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub department_id: i64,
    pub room_number: String,
    #[serde(default)]
    pub account: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorListResponse {
    pub doctors: Vec<Doctor>,
}

/// Branding labels shown by the administration UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfoResponse {
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&AppointmentStatus::Consulted).unwrap();
        assert_eq!(json, "\"Consulted\"");
        assert_eq!(AppointmentStatus::Pending.to_string(), "Pending");
    }

    #[test]
    fn test_create_appointment_request_defaults_emergency() {
        let request: CreateAppointmentRequest =
            serde_json::from_str(r#"{"patient_name":"Asha","age":30,"doctor_id":1}"#).unwrap();
        assert!(!request.is_emergency);
        assert_eq!(request.doctor_id, Some(1));
    }

    #[test]
    fn test_create_appointment_request_without_doctor() {
        let request: CreateAppointmentRequest =
            serde_json::from_str(r#"{"patient_name":"Asha","age":30,"doctor_id":null}"#).unwrap();
        assert!(request.doctor_id.is_none());
    }
}
