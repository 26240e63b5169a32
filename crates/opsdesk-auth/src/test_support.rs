//! Shared test doubles for the auth crate.

use crate::SessionManager;
use opsdesk_api::{
    ApiError, ApiResult, AuthBackend, EmailCheck, LoginResponse, UserId, UserRecord,
};
use opsdesk_storage::{CredentialVault, DurableStore, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

/// Token the mock backend issues on a successful login.
pub const TEST_TOKEN: &str = "test-token";

/// In-memory storage for testing.
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
        }
    }
}

impl DurableStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        Ok(self.data.lock().unwrap().remove(key).is_some())
    }
}

/// Scriptable in-memory auth backend modeling a single account.
///
/// Call counters let tests assert which endpoints were (not) reached.
pub struct MockBackend {
    vault: Arc<CredentialVault>,
    user: UserRecord,
    exists: Mutex<bool>,
    password: Mutex<Option<String>>,
    pub check_email_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
    pub create_password_calls: AtomicUsize,
}

impl MockBackend {
    pub fn new(
        vault: Arc<CredentialVault>,
        user: UserRecord,
        exists: bool,
        password: Option<&str>,
    ) -> Self {
        Self {
            vault,
            user,
            exists: Mutex::new(exists),
            password: Mutex::new(password.map(String::from)),
            check_email_calls: AtomicUsize::new(0),
            login_calls: AtomicUsize::new(0),
            create_password_calls: AtomicUsize::new(0),
        }
    }

    /// Flip account existence mid-test (e.g., deleted between two steps).
    pub fn set_exists(&self, exists: bool) {
        *self.exists.lock().unwrap() = exists;
    }

    fn account_exists(&self) -> bool {
        *self.exists.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl AuthBackend for MockBackend {
    async fn check_email(&self, email: &str) -> ApiResult<EmailCheck> {
        self.check_email_calls.fetch_add(1, Ordering::SeqCst);

        if !self.account_exists() || email != self.user.email {
            return Ok(EmailCheck {
                exists: false,
                has_password: false,
            });
        }

        Ok(EmailCheck {
            exists: true,
            has_password: self.password.lock().unwrap().is_some(),
        })
    }

    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);

        let stored = self.password.lock().unwrap().clone();
        match stored {
            Some(expected)
                if self.account_exists() && email == self.user.email && password == expected =>
            {
                self.vault.set_auth_token(TEST_TOKEN)?;
                Ok(LoginResponse {
                    user: self.user.clone(),
                    token: TEST_TOKEN.to_string(),
                })
            }
            _ => Err(ApiError::InvalidCredentials(String::new())),
        }
    }

    async fn create_password(&self, email: &str, password: &str) -> ApiResult<()> {
        self.create_password_calls.fetch_add(1, Ordering::SeqCst);

        if !self.account_exists() || email != self.user.email {
            return Err(ApiError::Validation("email not eligible".to_string()));
        }

        *self.password.lock().unwrap() = Some(password.to_string());
        Ok(())
    }

    async fn logout(&self) -> ApiResult<()> {
        self.vault.clear_auth_token()?;
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

/// A vault, a mock backend, and a session manager wired together.
pub struct TestHarness {
    pub vault: Arc<CredentialVault>,
    pub backend: Arc<MockBackend>,
    pub session: Arc<SessionManager>,
}

/// The canonical test account: id 1, a@b.com, existing with a password.
pub fn ada() -> UserRecord {
    UserRecord {
        id: UserId::Number(1),
        email: "a@b.com".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Byron".to_string(),
        role: "admin".to_string(),
    }
}

pub fn harness() -> TestHarness {
    harness_with(ada(), true, Some("hunter2hunter2"))
}

pub fn harness_with(user: UserRecord, exists: bool, password: Option<&str>) -> TestHarness {
    let vault = Arc::new(CredentialVault::new(Box::new(MemoryStore::new())));
    let backend = Arc::new(MockBackend::new(vault.clone(), user, exists, password));
    let session = Arc::new(SessionManager::new(vault.clone(), backend.clone()));
    TestHarness {
        vault,
        backend,
        session,
    }
}
