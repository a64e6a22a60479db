//! SQLite repositories, one per table family.

pub mod appointment_repository;
pub mod department_repository;
pub mod doctor_repository;

pub use appointment_repository::AppointmentRepository;
pub use department_repository::DepartmentRepository;
pub use doctor_repository::DoctorRepository;
