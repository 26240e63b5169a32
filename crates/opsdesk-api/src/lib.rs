//! Auth backend client for the opsdesk API.
//!
//! This crate provides:
//! - The wire types the auth endpoints exchange
//! - The [`AuthBackend`] contract consumed by the session layer
//! - [`HttpAuthBackend`], the REST implementation, which also owns the
//!   persistence of the bearer token it receives

mod backend;
mod error;
mod http;
mod types;

pub use backend::AuthBackend;
pub use error::{ApiError, ApiResult};
pub use http::HttpAuthBackend;
pub use types::{ApiMessage, EmailCheck, LoginResponse, UserId, UserRecord};
