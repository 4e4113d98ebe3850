//! REST API client module for ServiceTrade.
//!
//! This module provides the `ApiClient` context object, the error taxonomy,
//! and the generic CRUD service used by every resource type.
//!
//! The API accepts either an `X-Auth-Token` header (token auth) or an
//! `X-Session-Id` header obtained by posting a username/password to `/auth`.

pub mod client;
pub mod error;
pub mod resources;

pub use client::{ApiClient, Method};
pub use error::{Error, Result};
pub use resources::{Resources, DEFAULT_PAGE, DEFAULT_PER_PAGE};
