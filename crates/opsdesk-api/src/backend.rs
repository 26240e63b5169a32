//! The auth backend contract.

use crate::{ApiResult, EmailCheck, LoginResponse};

/// Contract for the auth backend consumed by the session layer.
///
/// A mockable async seam: the session manager and login flow only ever see
/// this trait, never the HTTP client directly. The backend also owns the
/// bearer token it issues — storing it on login, clearing it on logout —
/// which is why the token accessors live here and not on the session layer.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// Check whether an account exists for the email and has a password set.
    async fn check_email(&self, email: &str) -> ApiResult<EmailCheck>;

    /// Verify credentials and establish a token.
    ///
    /// On success the token has already been persisted by the backend.
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse>;

    /// Set the initial password for an account that has none yet.
    async fn create_password(&self, email: &str, password: &str) -> ApiResult<()>;

    /// Invalidate and clear the stored token.
    ///
    /// Server-side invalidation is best effort; the local token is cleared
    /// regardless.
    async fn logout(&self) -> ApiResult<()>;

    /// The currently stored token, if any.
    fn token(&self) -> ApiResult<Option<String>>;

    /// Replace or clear the stored token.
    fn set_token(&self, token: Option<&str>) -> ApiResult<()>;
}
