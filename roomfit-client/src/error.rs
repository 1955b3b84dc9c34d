use roomfit_core::{RequestFailure, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("service error: {status} - {message}")]
    Service { status: u16, message: String },

    #[error("malformed response (HTTP {status}): {source}")]
    Malformed {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// True if the request never produced a response.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// Collapses the error into the failure kinds the studio understands.
    /// A malformed body counts as a service failure.
    pub fn into_failure(self) -> RequestFailure {
        match self {
            ClientError::Validation(e) => RequestFailure::Invalid(e),
            ClientError::Network(e) => RequestFailure::Network(e.to_string()),
            ClientError::Service { status, message } => RequestFailure::Service { status, message },
            ClientError::Malformed { status, source } => RequestFailure::Service {
                status,
                message: format!("malformed response: {}", source),
            },
        }
    }
}

impl From<ClientError> for RequestFailure {
    fn from(error: ClientError) -> Self {
        error.into_failure()
    }
}
