//! HTTP client for the ServiceTrade REST API.
//!
//! `ApiClient` is the context object every operation goes through: it owns
//! the configuration, the session cache, and the connection pool. Clone is
//! cheap and clones share all of that state.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;

use crate::auth::{Auth, Session};
use crate::config::{incomplete_configuration_message, AuthMode, Configuration};
use crate::models::{Appointment, Company, Contact, Job, Location, Region, Resource};

use super::resources::Resources;
use super::{Error, Result};

const AUTH_TOKEN_HEADER: &str = "x-auth-token";
const SESSION_ID_HEADER: &str = "x-session-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(Error::UnsupportedMethod(s.to_string())),
        }
    }
}

/// Connection pool plus the timeouts it was built with.
struct HttpClient {
    client: Client,
    open_timeout: Duration,
    timeout: Duration,
}

impl HttpClient {
    fn build(config: &Configuration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.open_timeout)
            .read_timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            open_timeout: config.open_timeout,
            timeout: config.timeout,
        })
    }

    fn matches(&self, config: &Configuration) -> bool {
        self.open_timeout == config.open_timeout && self.timeout == config.timeout
    }
}

/// State shared by every clone of a client.
pub(crate) struct Shared {
    config: RwLock<Configuration>,
    session: Mutex<Session>,
    http: Mutex<HttpClient>,
    /// Serializes the authenticate-if-expired check
    pub(crate) auth_lock: tokio::sync::Mutex<()>,
}

/// API client for ServiceTrade.
/// Clone is cheap - reqwest::Client and the shared state are both behind Arc.
#[derive(Clone)]
pub struct ApiClient {
    shared: Arc<Shared>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: Configuration) -> Result<Self> {
        let http = HttpClient::build(&config)?;

        Ok(Self {
            shared: Arc::new(Shared {
                config: RwLock::new(config),
                session: Mutex::new(Session::new()),
                http: Mutex::new(http),
                auth_lock: tokio::sync::Mutex::new(()),
            }),
        })
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> Configuration {
        self.shared
            .config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Mutate the configuration in place.
    ///
    /// Changed timeouts take effect on the next request, which rebuilds the
    /// connection pool.
    pub fn update_config<F: FnOnce(&mut Configuration)>(&self, f: F) {
        let mut config = self.shared.config.write().unwrap_or_else(|e| e.into_inner());
        f(&mut config);
    }

    pub fn is_configured(&self) -> bool {
        self.config().is_configured()
    }

    pub fn validate_configuration(&self) -> Result<()> {
        self.config().validate()
    }

    pub(crate) fn session(&self) -> MutexGuard<'_, Session> {
        self.shared.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn shared(&self) -> &Shared {
        &self.shared
    }

    /// Connection pool for the current timeouts, rebuilt if they changed.
    fn http_client(&self, config: &Configuration) -> Result<Client> {
        let mut http = self.shared.http.lock().unwrap_or_else(|e| e.into_inner());
        if !http.matches(config) {
            debug!(
                open_timeout_ms = config.open_timeout.as_millis() as u64,
                timeout_ms = config.timeout.as_millis() as u64,
                "Rebuilding HTTP client for new timeouts"
            );
            *http = HttpClient::build(config)?;
        }
        Ok(http.client.clone())
    }

    /// Drop any cached session.
    pub fn reset(&self) {
        self.session().clear();
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    pub fn resources<T: Resource>(&self) -> Resources<'_, T> {
        Resources::new(self)
    }

    pub fn jobs(&self) -> Resources<'_, Job> {
        self.resources()
    }

    pub fn locations(&self) -> Resources<'_, Location> {
        self.resources()
    }

    pub fn regions(&self) -> Resources<'_, Region> {
        self.resources()
    }

    pub fn companies(&self) -> Resources<'_, Company> {
        self.resources()
    }

    pub fn contacts(&self) -> Resources<'_, Contact> {
        self.resources()
    }

    pub fn appointments(&self) -> Resources<'_, Appointment> {
        self.resources()
    }

    /// Issue a request and decode the JSON response.
    ///
    /// GET params become the query string, POST/PUT params the JSON body;
    /// DELETE sends no body. Unless `skip_auth` is set, exactly one auth
    /// header is attached, which may trigger a session exchange first.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: &Value,
        headers: Option<HeaderMap>,
        skip_auth: bool,
    ) -> Result<Value> {
        let auth = if skip_auth {
            None
        } else {
            Some(self.auth_header().await?)
        };
        let (status, body) = self.send(method, path, params, headers, auth).await?;
        Self::decode(status, &body)
    }

    pub async fn get(&self, path: &str, params: &Value) -> Result<Value> {
        self.request(Method::Get, path, params, None, false).await
    }

    pub async fn post(&self, path: &str, params: &Value) -> Result<Value> {
        self.request(Method::Post, path, params, None, false).await
    }

    pub async fn put(&self, path: &str, params: &Value) -> Result<Value> {
        self.request(Method::Put, path, params, None, false).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::Delete, path, &Value::Null, None, false).await
    }

    async fn auth_header(&self) -> Result<(HeaderName, HeaderValue)> {
        let config = self.config();
        match config.auth_mode() {
            AuthMode::TokenAuth => {
                let token = config.api_token.unwrap_or_default();
                Ok((
                    HeaderName::from_static(AUTH_TOKEN_HEADER),
                    header_value(token.trim())?,
                ))
            }
            AuthMode::SessionAuth => {
                let session_id = self.auth().session_id().await?;
                Ok((
                    HeaderName::from_static(SESSION_ID_HEADER),
                    header_value(&session_id)?,
                ))
            }
            AuthMode::Unconfigured => Err(Error::Configuration(incomplete_configuration_message())),
        }
    }

    /// Send a request and return the raw status and body without classifying it.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        params: &Value,
        headers: Option<HeaderMap>,
        auth: Option<(HeaderName, HeaderValue)>,
    ) -> Result<(StatusCode, String)> {
        let config = self.config();
        let url = format!("{}/{}", config.base_url, path.trim_start_matches('/'));

        // `timeout` bounds each read and the request as a whole
        let mut request = self
            .http_client(&config)?
            .request(method.as_reqwest(), &url)
            .timeout(config.timeout)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");

        if let Some((name, value)) = auth {
            request = request.header(name, value);
        }
        if let Some(extra) = headers {
            request = request.headers(extra);
        }

        request = match method {
            Method::Get => {
                let pairs = query_pairs(params);
                if pairs.is_empty() {
                    request
                } else {
                    request.query(&pairs)
                }
            }
            Method::Post | Method::Put => {
                let body = if params.is_null() {
                    Value::Object(Map::new())
                } else {
                    params.clone()
                };
                request.body(serde_json::to_string(&body)?)
            }
            Method::Delete => request,
        };

        debug!(method = %method, path = path, "Sending ServiceTrade request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(method = %method, path = path, status = status.as_u16(), "Received response");

        Ok((status, body))
    }

    /// Classify a response: 2xx bodies are decoded, everything else becomes an error.
    pub(crate) fn decode(status: StatusCode, body: &str) -> Result<Value> {
        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(Value::Object(Map::new()));
            }
            serde_json::from_str(body)
                .map_err(|e| Error::InvalidResponse(format!("failed to parse JSON response: {}", e)))
        } else {
            Err(Error::from_status(status, body))
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        Error::Configuration("Authentication value contains characters not allowed in an HTTP header".to_string())
    })
}

/// Flatten params into query pairs: nested objects use `key[sub]`, arrays are comma-joined.
fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Value::Object(map) = params {
        for (key, value) in map {
            flatten_param(&mut pairs, key.clone(), value);
        }
    }
    pairs
}

fn flatten_param(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (sub, nested) in map {
                flatten_param(pairs, format!("{}[{}]", key, sub), nested);
            }
        }
        Value::Array(items) => {
            let joined = items.iter().map(scalar_to_string).collect::<Vec<_>>().join(",");
            pairs.push((key, joined));
        }
        scalar => pairs.push((key, scalar_to_string(scalar))),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
