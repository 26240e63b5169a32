//! Client-side authentication for the opsdesk client.
//!
//! This crate provides:
//! - Session lifecycle management: restore on startup, sign-in, sign-out
//! - A persisted session snapshot paired with the backend's bearer token
//! - The progressive sign-in flow (email, password, create-password) with
//!   explicit FSM-based step tracking

mod error;
mod flow;
mod identity;
mod login_fsm;
mod session;

#[cfg(test)]
mod test_support;

pub use error::{AuthError, AuthResult};
pub use flow::LoginFlow;
pub use identity::{avatar_url, AuthUserView, SessionIdentity, UserProfile};
pub use login_fsm::login_flow;
pub use login_fsm::{LoginFlowInput, LoginFlowState, LoginMachine, LoginStep};
pub use session::SessionManager;
