use chrono::Utc;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, Error, Method, Result};
use crate::config::incomplete_configuration_message;

use super::session::{SessionData, SessionState};

const AUTH_PATH: &str = "auth";
const OAUTH_PATH: &str = "auth/userinfo";

const CREDENTIALS_HELP: &str = "This usually means:\n\
    • Your ServiceTrade username or password is incorrect\n\
    • Your ServiceTrade account may be locked or suspended\n\
    • The ServiceTrade API may be temporarily unavailable\n\
    \n\
    Please verify your credentials and try again.";

const OAUTH_HELP: &str = "This usually means:\n\
    • Your OAuth id_token or access_token is invalid or expired\n\
    • The tokens were not issued for your ServiceTrade account\n\
    • The ServiceTrade API may be temporarily unavailable\n\
    \n\
    Please verify your OAuth tokens and try again.";

const NO_SESSION_MESSAGE: &str =
    "No active authentication session found. Authenticate with an API token or username/password first.";

/// The `data` object returned by the auth endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(rename = "authToken", default)]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

/// Auth manager for a client.
///
/// Session state lives in the client's shared state, so every `Auth` handle
/// obtained from clones of the same client sees the same session.
pub struct Auth<'a> {
    client: &'a ApiClient,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn state(&self) -> SessionState {
        self.client.session().state()
    }

    /// Snapshot of the cached session, if any
    pub fn session(&self) -> Option<SessionData> {
        self.client.session().data.clone()
    }

    /// Reuse a previously issued session (e.g. one persisted by the caller).
    pub fn restore_session(&self, data: SessionData) {
        self.client.session().update(data);
    }

    pub fn reset(&self) {
        self.client.session().clear();
    }

    /// Current session id, authenticating first when there is no valid session.
    pub async fn session_id(&self) -> Result<String> {
        if let Some(id) = self.client.session().session_id() {
            debug!("Reusing cached ServiceTrade session");
            return Ok(id.to_string());
        }

        let _guard = self.client.shared().auth_lock.lock().await;

        // Another caller may have authenticated while we waited
        if let Some(id) = self.client.session().session_id() {
            return Ok(id.to_string());
        }

        self.authenticate().await
    }

    /// Exchange the configured username/password for a new session.
    pub async fn authenticate(&self) -> Result<String> {
        let config = self.client.config();
        if !config.username_password_auth_configured() {
            if config.token_auth_configured() {
                return Err(Error::Configuration(
                    "Session authentication needs a username and password. \
                     An API token is configured, so requests authenticate with it and no session is required."
                        .to_string(),
                ));
            }
            return Err(Error::Configuration(incomplete_configuration_message()));
        }

        let _in_flight = InFlight::begin(self.client);
        let body = json!({
            "username": config.username,
            "password": config.password,
        });

        let data = self.exchange(&body).await?;

        if let Some(ref token) = data.auth_token {
            let token = token.clone();
            self.client.update_config(|c| c.api_token = Some(token));
        }

        let session_id = data.session_id.clone();
        self.client.session().update(data);
        info!("Authenticated with ServiceTrade");

        Ok(session_id)
    }

    async fn exchange(&self, body: &Value) -> Result<SessionData> {
        let (status, text) = self
            .client
            .send(Method::Post, AUTH_PATH, body, None, None)
            .await?;

        if is_auth_failure(status) {
            let message = first_error_message(&text)
                .unwrap_or_else(|| Error::from_status(StatusCode::UNAUTHORIZED, &text).to_string());
            warn!(status = status.as_u16(), "ServiceTrade session authentication failed");
            return Err(Error::Authentication(with_help(&message, CREDENTIALS_HELP)));
        }

        let decoded = ApiClient::decode(status, &text)?;
        let session_id = decoded
            .get("sessionId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                Error::InvalidResponse("authentication response did not include a sessionId".to_string())
            })?;

        let data = decoded.get("data");
        let auth_token = data
            .and_then(|d| d.get("authToken"))
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string);
        let user_info = data
            .and_then(|d| d.get("user"))
            .filter(|u| !u.is_null())
            .cloned();

        Ok(SessionData {
            session_id: session_id.to_string(),
            auth_token,
            user_info,
            issued_at: Utc::now(),
        })
    }

    /// Check a username/password pair without touching the cached session.
    ///
    /// Both 401 and 403 count as bad credentials here.
    pub async fn authenticate_with_credentials(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let body = json!({
            "username": username,
            "password": password,
        });
        self.bootstrap(AUTH_PATH, &body, "Authentication failed", CREDENTIALS_HELP)
            .await
    }

    pub async fn authenticate_with_oauth_tokens(&self, id_token: &str, access_token: &str) -> Result<AuthResponse> {
        let body = json!({
            "id_token": id_token,
            "access_token": access_token,
        });
        self.bootstrap(OAUTH_PATH, &body, "OAuth authentication failed", OAUTH_HELP)
            .await
    }

    async fn bootstrap(&self, path: &str, body: &Value, default_message: &str, help: &str) -> Result<AuthResponse> {
        let (status, text) = self
            .client
            .send(Method::Post, path, body, None, None)
            .await?;

        if is_auth_failure(status) {
            let message = first_error_message(&text).unwrap_or_else(|| default_message.to_string());
            warn!(path = path, status = status.as_u16(), "ServiceTrade authentication rejected");
            return Err(Error::Authentication(with_help(&message, help)));
        }

        let decoded = ApiClient::decode(status, &text)?;
        let mut response = auth_response(&decoded)?;
        if !response.authenticated {
            let message = errors_in(&decoded).unwrap_or_else(|| default_message.to_string());
            warn!(path = path, "ServiceTrade reported authenticated=false");
            return Err(Error::Authentication(with_help(&message, help)));
        }
        if response.session_id.is_none() {
            response.session_id = decoded
                .get("sessionId")
                .and_then(Value::as_str)
                .map(str::to_string);
        }

        Ok(response)
    }

    /// Details of the user behind the current credentials.
    pub async fn current_user_info(&self) -> Result<AuthResponse> {
        match self.client.get(AUTH_PATH, &Value::Null).await {
            Ok(body) => auth_response(&body),
            Err(Error::NotFound(_)) => Err(Error::Authentication(NO_SESSION_MESSAGE.to_string())),
            Err(e) => Err(e),
        }
    }

    /// End the current session. Logging out twice is not an error.
    pub async fn logout(&self) -> Result<()> {
        let config = self.client.config();
        let has_session = self.client.session().is_valid();

        if config.token_auth_configured() || has_session {
            match self.client.delete(AUTH_PATH).await {
                Ok(_) => debug!("Logged out of ServiceTrade"),
                Err(Error::NotFound(_)) => warn!("No ServiceTrade session to log out of"),
                Err(e) => return Err(e),
            }
        }

        self.client.session().clear();
        Ok(())
    }

    /// Whether the configured credentials are currently accepted.
    ///
    /// Authentication failures are reported as `Ok(false)`; any other error
    /// is propagated.
    pub async fn is_authenticated(&self) -> Result<bool> {
        if !self.client.is_configured() {
            return Ok(false);
        }

        match self.current_user_info().await {
            Ok(info) => Ok(info.authenticated),
            Err(Error::Authentication(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Install an API token and mark the session active without a network call.
    pub fn set_api_token(&self, token: impl Into<String>, user_info: Option<Value>) {
        let token = token.into();
        let config_token = token.clone();
        self.client.update_config(|c| c.api_token = Some(config_token));
        self.client.session().update(SessionData {
            session_id: token.clone(),
            auth_token: Some(token),
            user_info,
            issued_at: Utc::now(),
        });
    }
}

/// Marks a session exchange in flight until dropped, including on cancellation.
struct InFlight<'a> {
    client: &'a ApiClient,
}

impl<'a> InFlight<'a> {
    fn begin(client: &'a ApiClient) -> Self {
        client.session().begin_authentication();
        Self { client }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.client.session().end_authentication();
    }
}

fn is_auth_failure(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

fn with_help(message: &str, help: &str) -> String {
    format!("{}\n\n{}", message, help)
}

fn auth_response(body: &Value) -> Result<AuthResponse> {
    let data = body
        .get("data")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    serde_json::from_value(data)
        .map_err(|e| Error::InvalidResponse(format!("failed to parse auth response: {}", e)))
}

/// First entry of `messages.error`, if the body has one.
fn errors_in(body: &Value) -> Option<String> {
    body.get("messages")
        .and_then(|m| m.get("error"))
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn first_error_message(text: &str) -> Option<String> {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| errors_in(&body))
}
