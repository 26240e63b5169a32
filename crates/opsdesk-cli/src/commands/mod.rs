//! CLI command implementations.

mod auth;

pub use auth::{login, logout, status};

use anyhow::Result;
use opsdesk_api::{AuthBackend, HttpAuthBackend};
use opsdesk_auth::SessionManager;
use opsdesk_core::{Config, Paths};
use opsdesk_storage::{CredentialVault, FileStore};
use std::sync::Arc;

/// Build the session manager and restore the persisted session.
pub async fn restore_session() -> Result<Arc<SessionManager>> {
    let paths = Paths::new()?;
    paths.ensure_dirs()?;

    let config = Config::load(&paths)?;
    config.validate()?;
    tracing::debug!(api_url = %config.api_url, "using opsdesk API");

    let store = FileStore::new(paths.credentials_file());
    let vault = Arc::new(CredentialVault::new(Box::new(store)));
    let backend: Arc<dyn AuthBackend> =
        Arc::new(HttpAuthBackend::new(config.api_url.clone(), vault.clone()));

    let session = Arc::new(SessionManager::new(vault, backend));
    session.restore().await?;

    Ok(session)
}
