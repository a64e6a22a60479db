//! Conversions between domain models and the `shared` DTOs.

pub mod appointment_mapper;
pub mod directory_mapper;
pub mod workload_mapper;

pub use appointment_mapper::AppointmentMapper;
pub use directory_mapper::{DepartmentMapper, DoctorMapper};
pub use workload_mapper::WorkloadMapper;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn format_date(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
