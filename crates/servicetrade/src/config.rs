//! Client configuration.
//!
//! Holds the credentials for one of the two supported authentication
//! strategies (API token or username/password), the API base URL, and
//! request timeouts. Nothing here performs I/O except the opt-in
//! [`Configuration::from_env`] constructor.

use std::fmt;
use std::time::Duration;

use crate::api::{Error, Result};

/// Base URL for the ServiceTrade REST API
pub const DEFAULT_API_BASE: &str = "https://api.servicetrade.com/api";

/// Read timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connect timeout in seconds
const DEFAULT_OPEN_TIMEOUT_SECS: u64 = 10;

pub const ENV_USERNAME: &str = "SERVICETRADE_USERNAME";
pub const ENV_PASSWORD: &str = "SERVICETRADE_PASSWORD";
pub const ENV_API_TOKEN: &str = "SERVICETRADE_API_TOKEN";

/// Which strategy a request will authenticate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    TokenAuth,
    SessionAuth,
    Unconfigured,
}

#[derive(Clone)]
pub struct Configuration {
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_token: Option<String>,
    /// Informational only. The version is part of `base_url`, so requests
    /// never send this value.
    pub api_version: String,
    /// Limit on each read and on the request as a whole
    pub timeout: Duration,
    /// Connect timeout
    pub open_timeout: Duration,
    pub base_url: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            username: None,
            password: None,
            api_token: None,
            api_version: "1".to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            open_timeout: Duration::from_secs(DEFAULT_OPEN_TIMEOUT_SECS),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("open_timeout", &self.open_timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `SERVICETRADE_*` environment variables,
    /// loading a `.env` file first if one exists.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            username: std::env::var(ENV_USERNAME).ok(),
            password: std::env::var(ENV_PASSWORD).ok(),
            api_token: std::env::var(ENV_API_TOKEN).ok(),
            ..Self::default()
        }
    }

    pub fn set_credentials(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.username = Some(username.into());
        self.password = Some(password.into());
    }

    pub fn set_api_token(&mut self, token: impl Into<String>) {
        self.api_token = Some(token.into());
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.set_credentials(username, password);
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.set_api_token(token);
        self
    }

    /// Point the client at a different API root (e.g. a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_open_timeout(mut self, open_timeout: Duration) -> Self {
        self.open_timeout = open_timeout;
        self
    }

    pub fn token_auth_configured(&self) -> bool {
        is_present(&self.api_token)
    }

    pub fn username_password_auth_configured(&self) -> bool {
        is_present(&self.username) && is_present(&self.password)
    }

    pub fn is_configured(&self) -> bool {
        self.token_auth_configured() || self.username_password_auth_configured()
    }

    /// Token auth wins when both strategies are configured.
    pub fn auth_mode(&self) -> AuthMode {
        if self.token_auth_configured() {
            AuthMode::TokenAuth
        } else if self.username_password_auth_configured() {
            AuthMode::SessionAuth
        } else {
            AuthMode::Unconfigured
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(Error::Configuration(incomplete_configuration_message()))
        }
    }
}

/// Guidance shown whenever no usable credentials are configured.
pub(crate) fn incomplete_configuration_message() -> String {
    format!(
        "ServiceTrade configuration is incomplete. You must configure either:\n\
         \n\
         Option 1 - API Token Authentication (recommended):\n\
         \x20 let config = Configuration::new().with_api_token(\"your_api_token\");\n\
         \n\
         Option 2 - Username/Password Authentication:\n\
         \x20 let config = Configuration::new().with_credentials(\"your_username\", \"your_password\");\n\
         \n\
         You can also use environment variables and Configuration::from_env():\n\
         \x20 # For token auth:\n\
         \x20 {token}=your_api_token\n\
         \x20 # For username/password auth:\n\
         \x20 {user}=your_username\n\
         \x20 {pass}=your_password\n\
         \n\
         To get an API token, authenticate once with username/password:\n\
         \x20 let auth = client.auth().authenticate_with_credentials(\"username\", \"password\").await?;\n\
         \x20 let api_token = auth.auth_token;",
        token = ENV_API_TOKEN,
        user = ENV_USERNAME,
        pass = ENV_PASSWORD,
    )
}
