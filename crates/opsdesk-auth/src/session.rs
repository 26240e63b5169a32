//! Session lifecycle management.
//!
//! The `SessionManager` holds the in-memory session (identity plus the
//! presentation view), restores it from the persisted snapshot on startup,
//! and keeps memory and storage in step across sign-in and sign-out. It is
//! an explicitly constructed instance passed by reference to callers; there
//! is no process-wide singleton.

use crate::error::INVALID_CREDENTIALS_MESSAGE;
use crate::{AuthError, AuthResult, AuthUserView, SessionIdentity};
use opsdesk_api::{ApiError, AuthBackend, UserRecord};
use opsdesk_storage::CredentialVault;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// In-memory session state.
///
/// Identity and view are only ever written together, which is what keeps
/// them consistent: both set, or both null, never one without the other.
struct SessionState {
    identity: Option<SessionIdentity>,
    view: Option<AuthUserView>,
    loading: bool,
    restored: bool,
}

/// Session manager for the authenticated identity.
///
/// The manager starts in a loading state; `restore` must run once before
/// sign-in/sign-out are accepted, so callers always observe a consistent
/// initial session.
pub struct SessionManager {
    vault: Arc<CredentialVault>,
    backend: Arc<dyn AuthBackend>,
    state: Mutex<SessionState>,
}

impl SessionManager {
    /// Create a new session manager.
    ///
    /// The session is not usable until [`SessionManager::restore`] has run.
    pub fn new(vault: Arc<CredentialVault>, backend: Arc<dyn AuthBackend>) -> Self {
        Self {
            vault,
            backend,
            state: Mutex::new(SessionState {
                identity: None,
                view: None,
                loading: true,
                restored: false,
            }),
        }
    }

    /// Restore the session from the persisted snapshot and token.
    ///
    /// Runs a single pass, once per process lifetime; later calls are
    /// no-ops that return the already-restored identity. A snapshot is only
    /// honored when a token is present alongside it and it parses as a user
    /// record; anything else clears both and restores to a null session.
    /// Corruption is logged, never surfaced — the user is simply not
    /// logged in. Always ends with `loading == false`.
    pub async fn restore(&self) -> AuthResult<Option<SessionIdentity>> {
        {
            let state = self.state.lock().unwrap();
            if state.restored {
                debug!("session already restored, skipping");
                return Ok(state.identity.clone());
            }
        }

        let record = self.read_persisted_session();

        let mut state = self.state.lock().unwrap();
        match record.as_ref() {
            Some(record) => {
                state.identity = Some(SessionIdentity::from(record));
                state.view = Some(AuthUserView::from(record));
                info!(user_id = %record.id, "session restored from snapshot");
            }
            None => {
                state.identity = None;
                state.view = None;
                info!("no session to restore");
            }
        }
        state.loading = false;
        state.restored = true;

        Ok(state.identity.clone())
    }

    /// Read and validate the persisted snapshot/token pair.
    ///
    /// Anything short of a parseable snapshot with a token next to it
    /// counts as no session, and stale or corrupt leftovers are removed on
    /// the spot so they cannot resurface on the next start.
    fn read_persisted_session(&self) -> Option<UserRecord> {
        let snapshot = match self.vault.get_user_snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "failed to read persisted snapshot, discarding session");
                self.discard_persisted_session();
                return None;
            }
        };

        let token = match self.backend.token() {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "failed to read stored token, discarding session");
                self.discard_persisted_session();
                return None;
            }
        };

        let raw = match (snapshot, token) {
            (Some(raw), Some(_)) => raw,
            (None, None) => return None,
            _ => {
                debug!("incomplete snapshot/token pair, discarding leftovers");
                self.discard_persisted_session();
                return None;
            }
        };

        match serde_json::from_str::<UserRecord>(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "persisted snapshot is corrupt, discarding session");
                self.discard_persisted_session();
                None
            }
        }
    }

    /// Remove snapshot and token together.
    fn discard_persisted_session(&self) {
        if let Err(err) = self.vault.clear_session() {
            warn!(error = %err, "failed to clear persisted session");
        }
    }

    /// Sign in with email and password.
    ///
    /// Credential verification is the backend's job; on success the raw
    /// user record is persisted as the new snapshot (the token was already
    /// stored by the backend client) and the in-memory session is replaced.
    /// On failure nothing is mutated.
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<SessionIdentity> {
        self.ensure_restored()?;

        debug!(email = %email, "signing in");

        let response = match self.backend.login(email, password).await {
            Ok(response) => response,
            Err(err @ ApiError::InvalidCredentials(_)) => {
                warn!(email = %email, "sign-in rejected");
                let message = err
                    .server_message()
                    .unwrap_or(INVALID_CREDENTIALS_MESSAGE)
                    .to_string();
                return Err(AuthError::InvalidCredentials(message));
            }
            Err(err) => {
                warn!(error = %err, "sign-in failed");
                return Err(AuthError::Api(err));
            }
        };

        // Persist the raw record first; memory only changes once the
        // snapshot write sticks.
        let snapshot = serde_json::to_string(&response.user)?;
        self.vault.set_user_snapshot(&snapshot)?;

        let identity = SessionIdentity::from(&response.user);
        let view = AuthUserView::from(&response.user);
        {
            let mut state = self.state.lock().unwrap();
            state.identity = Some(identity.clone());
            state.view = Some(view);
        }

        info!(user_id = %identity.id, "signed in");
        Ok(identity)
    }

    /// Sign out and clear the session.
    ///
    /// Local state is cleared unconditionally; backend token invalidation
    /// is fire-and-forget, so a logout glitch on the server can never
    /// strand the user in a signed-in-looking state.
    pub async fn sign_out(&self) -> AuthResult<()> {
        self.ensure_restored()?;

        {
            let mut state = self.state.lock().unwrap();
            state.identity = None;
            state.view = None;
        }

        if let Err(err) = self.vault.clear_user_snapshot() {
            warn!(error = %err, "failed to remove persisted snapshot on sign-out");
        }

        if let Err(err) = self.backend.logout().await {
            warn!(error = %err, "backend logout failed, local session already cleared");
        }

        info!("signed out");
        Ok(())
    }

    /// The current session identity, if signed in.
    pub fn identity(&self) -> Option<SessionIdentity> {
        self.state.lock().unwrap().identity.clone()
    }

    /// The current presentation view, if signed in.
    pub fn user_view(&self) -> Option<AuthUserView> {
        self.state.lock().unwrap().view.clone()
    }

    /// True until the startup restore has completed.
    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    /// True when a session identity is present.
    pub fn is_authenticated(&self) -> bool {
        self.state.lock().unwrap().identity.is_some()
    }

    /// The auth backend this manager talks to.
    pub fn backend(&self) -> Arc<dyn AuthBackend> {
        self.backend.clone()
    }

    fn ensure_restored(&self) -> AuthResult<()> {
        let state = self.state.lock().unwrap();
        if !state.restored {
            return Err(AuthError::NotRestored);
        }
        Ok(())
    }
}
