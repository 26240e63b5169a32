//! The interactive sign-in flow.
//!
//! Drives the three-step flow over the FSM in [`crate::login_fsm`]: the
//! email lookup decides the branch, both password branches converge on
//! [`SessionManager::sign_in`], and a successful sign-in is terminal.

use crate::login_fsm::{LoginFlowInput, LoginMachine, LoginStep};
use crate::{AuthError, SessionManager};
use opsdesk_api::AuthBackend;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shown when the email lookup finds no account.
pub const NO_ACCOUNT_MESSAGE: &str = "No account found with this email";

/// Shown when the new password and its confirmation differ.
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";

/// Shown when the new password is shorter than [`MIN_PASSWORD_LENGTH`].
pub const PASSWORD_TOO_SHORT_MESSAGE: &str = "Password must be at least 8 characters";

/// Minimum length for a newly created password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// One sign-in attempt: working fields plus the step machine.
///
/// Created fresh per attempt and discarded once the step is terminal. The
/// flow never panics on a failed submit; it stays on its current step and
/// carries a displayable message in `error` instead. Submits are ignored
/// while a previous one is still in flight.
pub struct LoginFlow {
    session: Arc<SessionManager>,
    backend: Arc<dyn AuthBackend>,
    machine: LoginMachine,
    email: String,
    password: String,
    confirm_password: String,
    error: Option<String>,
    loading: bool,
}

impl LoginFlow {
    /// Create a fresh flow on the email step.
    pub fn new(session: Arc<SessionManager>) -> Self {
        let backend = session.backend();
        Self {
            session,
            backend,
            machine: LoginMachine::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            error: None,
            loading: false,
        }
    }

    /// The current step.
    pub fn step(&self) -> LoginStep {
        LoginStep::from(self.machine.state())
    }

    /// The current error message, if the last submit failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True while a submit is awaiting the backend.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: &str) {
        self.email = email.to_string();
    }

    pub fn set_password(&mut self, password: &str) {
        self.password = password.to_string();
    }

    pub fn set_confirm_password(&mut self, confirm_password: &str) {
        self.confirm_password = confirm_password.to_string();
    }

    /// Submit the email step: look the account up and branch.
    ///
    /// An unknown email stays on the email step with a message; a lookup
    /// failure stays with the backend's message.
    pub async fn submit_email(&mut self) -> LoginStep {
        if self.loading {
            return self.step();
        }
        self.error = None;
        self.loading = true;

        let checked = self.backend.check_email(&self.email).await;
        match checked {
            Ok(check) if !check.exists => {
                debug!(email = %self.email, "no account for email");
                self.error = Some(NO_ACCOUNT_MESSAGE.to_string());
            }
            Ok(check) => {
                let input = if check.has_password {
                    LoginFlowInput::AccountHasPassword
                } else {
                    LoginFlowInput::AccountNeedsPassword
                };
                self.apply(&input);
            }
            Err(err) => {
                self.error = Some(AuthError::from(err).user_message());
            }
        }

        self.loading = false;
        self.step()
    }

    /// Submit the password step: sign in and finish the flow.
    pub async fn submit_password(&mut self) -> LoginStep {
        if self.loading {
            return self.step();
        }
        self.error = None;
        self.loading = true;

        let signed_in = self.session.sign_in(&self.email, &self.password).await;
        match signed_in {
            Ok(_) => {
                self.apply(&LoginFlowInput::SignedIn);
            }
            Err(err) => {
                self.error = Some(err.user_message());
            }
        }

        self.loading = false;
        self.step()
    }

    /// Submit the create-password step: validate locally, set the password,
    /// then sign in with it.
    ///
    /// Local validation failures short-circuit before any backend call and
    /// never toggle the loading flag.
    pub async fn submit_create_password(&mut self) -> LoginStep {
        if self.loading {
            return self.step();
        }
        self.error = None;

        if self.password != self.confirm_password {
            self.error = Some(PASSWORD_MISMATCH_MESSAGE.to_string());
            return self.step();
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            self.error = Some(PASSWORD_TOO_SHORT_MESSAGE.to_string());
            return self.step();
        }

        self.loading = true;

        let created = self
            .backend
            .create_password(&self.email, &self.password)
            .await;
        match created {
            Ok(()) => {
                let signed_in = self.session.sign_in(&self.email, &self.password).await;
                match signed_in {
                    Ok(_) => {
                        self.apply(&LoginFlowInput::SignedIn);
                    }
                    Err(err) => {
                        self.error = Some(err.user_message());
                    }
                }
            }
            Err(err) => {
                self.error = Some(AuthError::from(err).user_message());
            }
        }

        self.loading = false;
        self.step()
    }

    /// Go back to the email step, clearing the password fields.
    pub fn back(&mut self) -> LoginStep {
        if matches!(self.step(), LoginStep::Password | LoginStep::CreatePassword) {
            self.password.clear();
            self.confirm_password.clear();
            self.error = None;
            self.apply(&LoginFlowInput::Back);
        }
        self.step()
    }

    fn apply(&mut self, input: &LoginFlowInput) {
        if self.machine.consume(input).is_err() {
            warn!(step = ?self.step(), input = ?input, "impossible flow transition ignored");
        }
    }
}
