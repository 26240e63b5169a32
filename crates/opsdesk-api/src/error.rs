//! API error types.

use thiserror::Error;

/// Error type for auth backend operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Wrong email or password (HTTP 401)
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Request rejected by server-side validation (HTTP 400/422)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Any other non-success response from the server
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Storage error (token persistence)
    #[error("Storage error: {0}")]
    Storage(#[from] opsdesk_storage::StorageError),
}

impl ApiError {
    /// Returns true if this error is transient and the operation can be retried.
    ///
    /// Transient errors are connection failures, timeouts, and 5xx responses.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Server { status, .. } => *status >= 500,
            ApiError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    return true;
                }
                if let Some(status) = e.status() {
                    return status.is_server_error();
                }
                false
            }
            _ => false,
        }
    }

    /// The server-provided message, when this error carries one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::InvalidCredentials(message)
            | ApiError::Validation(message)
            | ApiError::Server { message, .. } => {
                let trimmed = message.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_5xx_is_transient() {
        let err = ApiError::Server {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn server_4xx_is_not_transient() {
        let err = ApiError::Server {
            status: 404,
            message: "not found".to_string(),
        };
        assert!(!err.is_transient());
    }

    #[test]
    fn invalid_credentials_is_not_transient() {
        assert!(!ApiError::InvalidCredentials("bad password".to_string()).is_transient());
    }

    #[test]
    fn server_message_skips_blank_messages() {
        assert_eq!(
            ApiError::InvalidCredentials("  ".to_string()).server_message(),
            None
        );
        assert_eq!(
            ApiError::Validation("email not eligible".to_string()).server_message(),
            Some("email not eligible")
        );
    }
}
