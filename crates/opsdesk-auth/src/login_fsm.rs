//! Sign-in flow state machine using rust-fsm.
//!
//! The flow has three interactive steps and one terminal state, with
//! branching decided by the email lookup:
//!
//! ```text
//! ┌─────────────────┐
//! │      Email      │ (initial)
//! └────────┬────────┘
//!          │ AccountHasPassword / AccountNeedsPassword
//!          ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │    Password     │     │ CreatePassword  │
//! └────────┬────────┘     └────────┬────────┘
//!          │   Back ──► Email  ◄── │ Back
//!          │ SignedIn              │ SignedIn
//!          ▼                       ▼
//! ┌─────────────────────────────────────────┐
//! │                Complete                 │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Failed submits do not transition; the flow stays on its current step and
//! carries the error message in the working state instead.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Define the FSM using rust-fsm's declarative macro.
// This generates a module `login_flow` with:
// - login_flow::State (enum)
// - login_flow::Input (enum)
// - login_flow::StateMachine (type alias)
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub login_flow(Email)

    Email => {
        AccountHasPassword => Password,
        AccountNeedsPassword => CreatePassword
    },
    Password => {
        Back => Email,
        SignedIn => Complete
    },
    CreatePassword => {
        Back => Email,
        SignedIn => Complete
    }
}

// Re-export the generated types with clearer names
pub use login_flow::Input as LoginFlowInput;
pub use login_flow::State as LoginFlowState;
pub use login_flow::StateMachine as LoginMachine;

/// User-facing sign-in step for rendering and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoginStep {
    /// Entering the account email.
    Email,
    /// Entering the password for an existing account.
    Password,
    /// Setting the initial password for a passwordless account.
    CreatePassword,
    /// Signed in; the flow is finished.
    Complete,
}

impl LoginStep {
    /// Returns true once the flow has produced a session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoginStep::Complete)
    }
}

impl From<&LoginFlowState> for LoginStep {
    fn from(state: &LoginFlowState) -> Self {
        match state {
            LoginFlowState::Email => LoginStep::Email,
            LoginFlowState::Password => LoginStep::Password,
            LoginFlowState::CreatePassword => LoginStep::CreatePassword,
            LoginFlowState::Complete => LoginStep::Complete,
        }
    }
}
