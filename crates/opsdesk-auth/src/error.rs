//! Authentication error types.

use opsdesk_api::ApiError;
use thiserror::Error;

/// Default message when the backend rejects credentials without one.
pub(crate) const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect email or password";

/// Fallback message for failures the user can do nothing specific about.
pub(crate) const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Wrong email or password, carrying a user-displayable message
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Operation attempted before the startup restore completed
    #[error("Session not restored yet")]
    NotRestored,

    /// Auth backend error
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] opsdesk_storage::StorageError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuthError {
    /// The message to show the user for this error.
    ///
    /// Backend-provided messages win; a credentials rejection without one
    /// falls back to "Incorrect email or password", everything else to a
    /// generic retry message. Nothing here ever exposes internals.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(message) => message.clone(),
            AuthError::Api(err @ ApiError::InvalidCredentials(_)) => err
                .server_message()
                .unwrap_or(INVALID_CREDENTIALS_MESSAGE)
                .to_string(),
            AuthError::Api(err) => err
                .server_message()
                .unwrap_or(GENERIC_ERROR_MESSAGE)
                .to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_keeps_own_message() {
        let err = AuthError::InvalidCredentials("Incorrect email or password".to_string());
        assert_eq!(err.user_message(), "Incorrect email or password");
    }

    #[test]
    fn api_credentials_rejection_defaults_when_blank() {
        let err = AuthError::Api(ApiError::InvalidCredentials(String::new()));
        assert_eq!(err.user_message(), INVALID_CREDENTIALS_MESSAGE);
    }

    #[test]
    fn api_credentials_rejection_keeps_server_message() {
        let err = AuthError::Api(ApiError::InvalidCredentials(
            "Account locked after too many attempts".to_string(),
        ));
        assert_eq!(
            err.user_message(),
            "Account locked after too many attempts"
        );
    }

    #[test]
    fn server_error_falls_back_to_generic() {
        let err = AuthError::Api(ApiError::Server {
            status: 500,
            message: String::new(),
        });
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn server_error_keeps_server_message() {
        let err = AuthError::Api(ApiError::Server {
            status: 503,
            message: "Maintenance in progress".to_string(),
        });
        assert_eq!(err.user_message(), "Maintenance in progress");
    }

    #[test]
    fn storage_error_is_never_shown_raw() {
        let err = AuthError::Storage(opsdesk_storage::StorageError::Backend(
            "disk on fire".to_string(),
        ));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
