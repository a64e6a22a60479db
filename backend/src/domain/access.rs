//! # Access Policy
//!
//! Who may see which queues and who may change an appointment. Every check is
//! a plain function of the caller's role (and, where relevant, the doctor who
//! owns the resource) returning an explicit [`Access`] decision, so the rules
//! can be exercised without a web layer.

use super::errors::{QueueError, QueueResult};

/// Identity supplied by the authenticating layer in front of the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub account: String,
    pub is_admin: bool,
}

/// What the caller is, as far as the queue is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    Administrator,
    /// A doctor, identified by their doctor id
    Doctor(i64),
    /// Any other authenticated user (reception, nursing staff)
    Staff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Permit,
    Deny,
}

impl Access {
    pub fn is_permitted(self) -> bool {
        self == Access::Permit
    }

    /// Turn a denial into a `Forbidden` error carrying `reason`
    pub fn require(self, reason: &str) -> QueueResult<()> {
        match self {
            Access::Permit => Ok(()),
            Access::Deny => Err(QueueError::Forbidden(reason.to_string())),
        }
    }
}

/// Which doctors' queues a caller gets to see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueScope {
    AllDoctors,
    SingleDoctor(i64),
}

/// Administrators and staff see every queue, a doctor sees only their own
pub fn queue_scope(role: CallerRole) -> QueueScope {
    match role {
        CallerRole::Administrator => QueueScope::AllDoctors,
        CallerRole::Doctor(doctor_id) => QueueScope::SingleDoctor(doctor_id),
        CallerRole::Staff => QueueScope::AllDoctors,
    }
}

/// Changing an appointment's status is reserved for administrators and the
/// doctor the appointment is booked with
pub fn authorize_status_change(role: CallerRole, owner_doctor_id: i64) -> Access {
    match role {
        CallerRole::Administrator => Access::Permit,
        CallerRole::Doctor(doctor_id) if doctor_id == owner_doctor_id => Access::Permit,
        _ => Access::Deny,
    }
}

/// Analytics, exports and directory changes
pub fn authorize_admin(role: CallerRole) -> Access {
    match role {
        CallerRole::Administrator => Access::Permit,
        _ => Access::Deny,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_scope() {
        assert_eq!(queue_scope(CallerRole::Administrator), QueueScope::AllDoctors);
        assert_eq!(queue_scope(CallerRole::Doctor(4)), QueueScope::SingleDoctor(4));
        assert_eq!(queue_scope(CallerRole::Staff), QueueScope::AllDoctors);
    }

    #[test]
    fn test_status_change_requires_admin_or_owner() {
        assert!(authorize_status_change(CallerRole::Administrator, 1).is_permitted());
        assert!(authorize_status_change(CallerRole::Doctor(1), 1).is_permitted());
        assert_eq!(authorize_status_change(CallerRole::Doctor(2), 1), Access::Deny);
        assert_eq!(authorize_status_change(CallerRole::Staff, 1), Access::Deny);
    }

    #[test]
    fn test_admin_only() {
        assert!(authorize_admin(CallerRole::Administrator).is_permitted());
        assert!(!authorize_admin(CallerRole::Doctor(1)).is_permitted());
        assert!(!authorize_admin(CallerRole::Staff).is_permitted());
    }

    #[test]
    fn test_require_maps_denial_to_forbidden() {
        assert!(Access::Permit.require("nope").is_ok());
        match Access::Deny.require("Analytics are restricted") {
            Err(QueueError::Forbidden(reason)) => assert_eq!(reason, "Analytics are restricted"),
            other => panic!("Expected Forbidden, got {:?}", other),
        }
    }
}
