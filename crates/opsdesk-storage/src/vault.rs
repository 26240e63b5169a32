//! High-level API for the persisted session credentials.

use crate::{DurableStore, StorageKeys, StorageResult};

/// High-level API for storing and retrieving session credentials.
///
/// The snapshot and the token live under independent keys, but the pair is
/// what makes a session: [`CredentialVault::has_session`] requires both, and
/// [`CredentialVault::clear_session`] removes both.
pub struct CredentialVault {
    store: Box<dyn DurableStore>,
}

impl CredentialVault {
    /// Create a new vault with the given storage backend
    pub fn new(store: Box<dyn DurableStore>) -> Self {
        Self { store }
    }

    // ==========================================
    // User snapshot
    // ==========================================

    /// Store the serialized user record snapshot
    pub fn set_user_snapshot(&self, raw: &str) -> StorageResult<()> {
        self.store.set(StorageKeys::AUTH_USER, raw)
    }

    /// Retrieve the serialized user record snapshot
    pub fn get_user_snapshot(&self) -> StorageResult<Option<String>> {
        self.store.get(StorageKeys::AUTH_USER)
    }

    /// Remove the user record snapshot
    pub fn clear_user_snapshot(&self) -> StorageResult<bool> {
        self.store.remove(StorageKeys::AUTH_USER)
    }

    // ==========================================
    // Auth token
    // ==========================================

    /// Store the bearer token
    pub fn set_auth_token(&self, token: &str) -> StorageResult<()> {
        self.store.set(StorageKeys::AUTH_TOKEN, token)
    }

    /// Retrieve the bearer token
    pub fn get_auth_token(&self) -> StorageResult<Option<String>> {
        self.store.get(StorageKeys::AUTH_TOKEN)
    }

    /// Remove the bearer token
    pub fn clear_auth_token(&self) -> StorageResult<bool> {
        self.store.remove(StorageKeys::AUTH_TOKEN)
    }

    // ==========================================
    // Session
    // ==========================================

    /// Check if a complete persisted session exists (snapshot and token)
    pub fn has_session(&self) -> StorageResult<bool> {
        let has_snapshot = self.store.has(StorageKeys::AUTH_USER)?;
        let has_token = self.store.has(StorageKeys::AUTH_TOKEN)?;
        Ok(has_snapshot && has_token)
    }

    /// Clear the persisted session (snapshot and token)
    pub fn clear_session(&self) -> StorageResult<()> {
        let _ = self.store.remove(StorageKeys::AUTH_USER);
        let _ = self.store.remove(StorageKeys::AUTH_TOKEN);
        Ok(())
    }
}
