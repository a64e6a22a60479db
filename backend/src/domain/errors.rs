use super::models::appointment::AppointmentStatus;

/// Failures reported back to the caller of a domain operation
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Missing or malformed input, e.g. no doctor selected
    #[error("{0}")]
    Validation(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Permission denied: {0}")]
    Forbidden(String),
    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    #[error("Failed to build document: {0}")]
    Export(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type QueueResult<T> = Result<T, QueueError>;

impl QueueError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        QueueError::NotFound { entity, id }
    }
}
