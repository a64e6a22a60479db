//! # Domain Module
//!
//! Business rules of the outpatient queue: token assignment at registration,
//! queue visibility and status changes, workload analytics, the daily summary
//! document and the department/doctor directory.
//!
//! Services own their repositories and a [`clock::ClinicClock`], so "today"
//! is always the clinic's calendar day and can be pinned in tests. Every
//! operation returns a [`errors::QueueResult`]; the REST layer decides how a
//! failure is presented.

pub mod access;
pub mod clock;
pub mod commands;
pub mod directory_service;
pub mod errors;
pub mod export_service;
pub mod models;
pub mod queue_service;
pub mod registration_service;
pub mod workload_service;

#[cfg(test)]
pub mod test_utils;

pub use access::{Caller, CallerRole};
pub use clock::{ClinicClock, Clock, FixedClock, SystemClock};
pub use directory_service::DirectoryService;
pub use errors::{QueueError, QueueResult};
pub use export_service::ExportService;
pub use queue_service::QueueService;
pub use registration_service::RegistrationService;
pub use workload_service::WorkloadService;
