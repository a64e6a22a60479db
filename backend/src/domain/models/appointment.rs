use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    Pending,
    Consulted,
    Cancelled,
}

impl AppointmentStatus {
    /// Label stored in the `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Consulted => "Consulted",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }

    /// Whether an appointment in this status may be moved to `target`.
    /// Re-applying the current status is allowed and changes nothing.
    pub fn can_transition_to(&self, target: AppointmentStatus) -> bool {
        match (self, target) {
            (current, target) if *current == target => true,
            (AppointmentStatus::Pending, AppointmentStatus::Consulted) => true,
            (AppointmentStatus::Pending, AppointmentStatus::Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(AppointmentStatus::Pending),
            "Consulted" => Ok(AppointmentStatus::Consulted),
            "Cancelled" => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("Invalid appointment status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub patient_name: String,
    pub age: u32,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub token_number: u32,
    pub is_emergency: bool,
    pub status: AppointmentStatus,
    pub registration_time: DateTime<Utc>,
    /// Clinic calendar day the appointment was registered on
    pub registration_day: NaiveDate,
    pub estimated_time: DateTime<Utc>,
}

/// Everything needed to register an appointment except its token and estimate,
/// which are decided atomically by the repository
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentDraft {
    pub patient_name: String,
    pub age: u32,
    pub doctor_id: i64,
    pub is_emergency: bool,
    pub registration_time: DateTime<Utc>,
    pub registration_day: NaiveDate,
}
