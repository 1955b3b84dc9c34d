use thiserror::Error;

/// Input rejected before any request is issued.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("add furniture to the room first")]
    EmptyLayout,

    #[error("design name is required")]
    MissingDesignName,

    #[error("room name is required")]
    MissingRoomName,

    #[error("{field} must be a positive number of feet, got {value}")]
    InvalidDimension { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("rotation must be a whole multiple of 90 degrees, got {0}")]
pub struct InvalidRotation(pub f64);

/// How a completed (or abandoned) backend request failed.
///
/// This is the controller-facing view of a transport error; the HTTP client
/// maps its own error type onto it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestFailure {
    /// Rejected before sending; nothing reached the service.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// No response was received.
    #[error("network error: {0}")]
    Network(String),

    /// A response arrived but was not a usable success.
    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StudioError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("a request of this kind is already in flight")]
    Busy,
}
