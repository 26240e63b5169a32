//! REST implementation of the auth backend.

use crate::{ApiError, ApiMessage, ApiResult, AuthBackend, EmailCheck, LoginResponse};
use opsdesk_storage::CredentialVault;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// HTTP client for the opsdesk auth endpoints.
pub struct HttpAuthBackend {
    http_client: reqwest::Client,
    api_url: String,
    vault: Arc<CredentialVault>,
}

impl HttpAuthBackend {
    /// Create a new backend client.
    ///
    /// # Arguments
    /// * `api_url` - Base URL of the opsdesk API (e.g., `https://api.opsdesk.dev`)
    /// * `vault` - Credential vault used to persist the bearer token
    pub fn new(api_url: impl Into<String>, vault: Arc<CredentialVault>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            vault,
        }
    }

    /// Build the URL for an auth endpoint.
    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/{}", self.api_url, path)
    }

    /// Map a non-success response to an [`ApiError`].
    async fn error_from_response(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "auth request rejected");

        let message = serde_json::from_str::<ApiMessage>(&body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.to_string()
                } else {
                    body.clone()
                }
            });

        match status.as_u16() {
            401 => ApiError::InvalidCredentials(message),
            400 | 422 => ApiError::Validation(message),
            _ => ApiError::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

#[async_trait::async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn check_email(&self, email: &str) -> ApiResult<EmailCheck> {
        let url = self.auth_url("check-email");
        debug!(url = %url, email = %email, "checking email");

        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let check: EmailCheck = response.json().await?;
        debug!(
            exists = check.exists,
            has_password = check.has_password,
            "email check complete"
        );
        Ok(check)
    }

    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let url = self.auth_url("login");
        debug!(url = %url, email = %email, "attempting email/password login");

        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let data: LoginResponse = response.json().await?;

        // The token is this client's to keep; store it before handing the
        // user record to the session layer.
        self.vault.set_auth_token(&data.token)?;

        info!(user_id = %data.user.id, "login successful");
        Ok(data)
    }

    async fn create_password(&self, email: &str, password: &str) -> ApiResult<()> {
        let url = self.auth_url("create-password");
        debug!(url = %url, email = %email, "creating password");

        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        info!(email = %email, "password created");
        Ok(())
    }

    async fn logout(&self) -> ApiResult<()> {
        let token = self.vault.get_auth_token()?;
        self.vault.clear_auth_token()?;

        // Server-side invalidation is best effort; the local token is
        // already gone at this point.
        if let Some(token) = token {
            let url = self.auth_url("logout");
            match self.http_client.post(&url).bearer_auth(&token).send().await {
                Ok(response) if !response.status().is_success() => {
                    debug!(status = %response.status(), "server-side logout rejected");
                }
                Err(err) => {
                    debug!(error = %err, "server-side logout failed");
                }
                Ok(_) => {}
            }
        }

        Ok(())
    }

    fn token(&self) -> ApiResult<Option<String>> {
        Ok(self.vault.get_auth_token()?)
    }

    fn set_token(&self, token: Option<&str>) -> ApiResult<()> {
        match token {
            Some(token) => self.vault.set_auth_token(token)?,
            None => {
                self.vault.clear_auth_token()?;
            }
        }
        Ok(())
    }
}
