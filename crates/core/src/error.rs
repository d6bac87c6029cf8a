// Error types for the backend client, the store and persistence

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by the backend client
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (connection refused, DNS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A success response carried a body we could not read
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ClientError::Api {
            status,
            message: message.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        ClientError::Decode(msg.into())
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a response was received from the backend
    pub fn is_api(&self) -> bool {
        matches!(self, ClientError::Api { .. })
    }
}

/// Errors raised by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend rejected or failed the call; passed through unchanged
    #[error(transparent)]
    Backend(#[from] ClientError),

    #[error("Facility not found: {0}")]
    FacilityNotFound(Uuid),

    #[error("Camera already exists: {0}")]
    DuplicateCamera(Uuid),

    #[error("Facility already exists: {0}")]
    DuplicateFacility(Uuid),
}

impl StoreError {
    /// The backend error, if this failure came from the backend client
    pub fn as_client_error(&self) -> Option<&ClientError> {
        match self {
            StoreError::Backend(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors raised while loading or saving local state
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("State file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("State encoding error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_backend_message() {
        let err = ClientError::api(409, "Camera already registered");
        assert_eq!(err.to_string(), "Camera already registered");
        assert_eq!(err.status(), Some(409));
        assert!(err.is_api());
    }

    #[test]
    fn test_store_error_is_transparent_for_backend_errors() {
        let err = StoreError::from(ClientError::api(500, "boom"));
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.as_client_error().and_then(|e| e.status()), Some(500));
    }
}
