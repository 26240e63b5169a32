//! Storage key constants.

/// Storage keys used by the client
pub struct StorageKeys;

impl StorageKeys {
    /// Persisted user record snapshot (serialized JSON), written on sign-in.
    /// Same key the web client uses in localStorage.
    pub const AUTH_USER: &'static str = "auth_user";

    /// Bearer token issued by the auth backend
    pub const AUTH_TOKEN: &'static str = "auth_token";
}
