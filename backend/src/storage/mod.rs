//! # Storage Layer
//!
//! SQLite persistence for departments, doctors, appointments and the
//! per-doctor daily token counters. Repositories return domain models and
//! report failures as `anyhow` errors; the domain layer decides what they mean.

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{AppointmentRepository, DepartmentRepository, DoctorRepository};
