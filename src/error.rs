/// Unified error types for the event chain service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure reported by an event storage backend.
///
/// Backends answer "not found" with `Ok(None)`; this error covers everything else
/// (unreachable endpoint, permission denied, broken body stream, ...).
#[derive(Error, Debug)]
#[error("{0}")]
pub struct StorageError(pub String);

/// Failures of the event chain resolver
#[derive(Error, Debug)]
pub enum ChainError {
    /// Caller supplied an empty identifier
    #[error("{0}")]
    BadRequest(String),

    /// No object is stored under the key
    #[error("Event not found: {key}")]
    NotFound { key: String },

    /// The backend could not be reached or answered with an error
    #[error("Failed to read event {key}: {source}")]
    Transport {
        key: String,
        #[source]
        source: StorageError,
    },

    /// Stored bytes are not a well-formed event
    #[error("Malformed event data under {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Stored event has no back-reference to follow
    #[error("Event {key} has an empty previous reference")]
    MissingPrevious { key: String },

    /// Walk exceeded the configured hop bound, the chain is either very long or cyclic
    #[error("Chain starting at {head} exceeds {max_hops} hops (possible cycle)")]
    ChainTooLong { head: String, max_hops: usize },

    /// Request deadline passed before the walk completed
    #[error("Deadline exceeded while reading event {key}")]
    DeadlineExceeded { key: String },
}

impl ChainError {
    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ChainError::BadRequest(_) => "bad_request",
            ChainError::NotFound { .. } => "not_found",
            ChainError::Transport { .. } => "transport",
            ChainError::Decode { .. } => "decode",
            ChainError::MissingPrevious { .. } => "missing_previous",
            ChainError::ChainTooLong { .. } => "chain_too_long",
            ChainError::DeadlineExceeded { .. } => "deadline_exceeded",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ChainError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ChainError::NotFound { .. } => StatusCode::NOT_FOUND,
            ChainError::DeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
            ChainError::Transport { .. }
            | ChainError::Decode { .. }
            | ChainError::MissingPrevious { .. }
            | ChainError::ChainTooLong { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Main error type for the service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Event resolution errors
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert ServiceError to HTTP response
///
/// Bodies are plain text carrying the failure description.
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServiceError::Chain(err) => (err.status_code(), self.to_string()),
            ServiceError::Internal(_) | ServiceError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(), // Don't leak details
            ),
            ServiceError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request_failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request_rejected");
        }

        (status, message).into_response()
    }
}

/// Result type alias for resolver operations
pub type ChainResult<T> = Result<T, ChainError>;

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
