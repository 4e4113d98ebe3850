//! Client library for the ServiceTrade field-service management API.
//!
//! Build a [`Configuration`], wrap it in an [`ApiClient`], and go through the
//! client for everything else:
//!
//! ```no_run
//! use servicetrade::{ApiClient, Configuration};
//! use serde_json::json;
//!
//! # async fn run() -> servicetrade::Result<()> {
//! let client = ApiClient::new(Configuration::new().with_api_token("token"))?;
//! let jobs = client.jobs().list(json!({"status": "completed"}), 1, 100).await?;
//! for job in &jobs {
//!     println!("{:?}", job.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Clones of a client share configuration and session. A client may be
//! used from several tasks; concurrent callers that find no valid session
//! wait for a single authentication instead of racing.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, Error, Method, Resources, Result};
pub use auth::{Auth, AuthResponse, SessionData, SessionState};
pub use config::{AuthMode, Configuration};
pub use models::{Appointment, Attributes, Company, Contact, Job, Location, Page, Region, Resource};
