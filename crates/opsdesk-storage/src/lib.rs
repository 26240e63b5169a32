//! Durable client-side storage for the opsdesk client.
//!
//! The web client keeps its session in browser localStorage; native clients
//! get the same contract through the [`DurableStore`] trait. The default
//! backend is a single JSON object file under the user's home directory.

mod file;
mod keys;
mod traits;
mod vault;

pub use file::FileStore;
pub use keys::StorageKeys;
pub use traits::DurableStore;
pub use vault::CredentialVault;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific storage error
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
