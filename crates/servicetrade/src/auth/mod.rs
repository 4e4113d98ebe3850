//! Authentication and session management.
//!
//! This module provides:
//! - `Auth`: the auth manager, reached through `ApiClient::auth()`
//! - `Session`: the cached session with its 24 hour expiry
//!
//! Token auth needs no session at all; session auth exchanges a
//! username/password for a session id on first use.

pub mod manager;
pub mod session;

pub use manager::{Auth, AuthResponse};
pub use session::{Session, SessionData, SessionState};
