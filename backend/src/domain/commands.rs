//! Domain-level command and result types.
//! These are used by the services and are not exposed over the public API;
//! the REST layer maps the `shared` DTOs to and from them.

pub mod registration {
    use crate::domain::models::appointment::Appointment;

    /// Input for registering a patient.
    #[derive(Debug, Clone)]
    pub struct RegisterPatientCommand {
        pub patient_name: String,
        pub age: i64,
        pub doctor_id: Option<i64>,
        pub is_emergency: bool,
    }

    /// Result of a registration: the stored appointment and the one-time wait estimate.
    #[derive(Debug, Clone)]
    pub struct RegistrationResult {
        pub appointment: Appointment,
        pub estimated_wait_minutes: i64,
    }
}

pub mod queue {
    /// Result of marking several appointments consulted at once.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct BulkConsultResult {
        pub consulted_ids: Vec<i64>,
        pub not_found_ids: Vec<i64>,
        pub skipped_ids: Vec<i64>,
    }
}

pub mod directory {
    /// Input for creating a department.
    #[derive(Debug, Clone)]
    pub struct CreateDepartmentCommand {
        pub name: String,
    }

    /// Input for creating a doctor.
    #[derive(Debug, Clone)]
    pub struct CreateDoctorCommand {
        pub name: String,
        pub department_id: i64,
        pub room_number: String,
        pub account: Option<String>,
    }
}
