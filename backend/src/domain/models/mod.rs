pub mod appointment;
pub mod department;
pub mod doctor;
pub mod workload;
