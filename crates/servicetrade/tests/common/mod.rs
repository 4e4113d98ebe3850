//! Shared helpers for the integration tests: a mock ServiceTrade API and
//! clients pointed at it.

// Allow dead code: not every test binary uses every helper
#![allow(dead_code)]

use serde_json::{json, Value};
use servicetrade::{ApiClient, Configuration};
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USERNAME: &str = "test_user";
pub const PASSWORD: &str = "test_password";

/// Install a test log writer once; RUST_LOG controls the level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub async fn setup_mock_server() -> MockServer {
    init_tracing();
    MockServer::start().await
}

/// Configuration whose base URL is the mock server's `/api` root.
pub fn base_config(server: &MockServer) -> Configuration {
    Configuration::new().with_base_url(format!("{}/api", server.uri()))
}

pub fn client(config: Configuration) -> ApiClient {
    ApiClient::new(config).expect("client should build")
}

pub fn token_client(server: &MockServer, token: &str) -> ApiClient {
    client(base_config(server).with_api_token(token))
}

pub fn session_client(server: &MockServer) -> ApiClient {
    client(base_config(server).with_credentials(USERNAME, PASSWORD))
}

/// `POST /api/auth` with the test credentials.
pub fn auth_mock() -> wiremock::MockBuilder {
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .and(body_json(json!({"username": USERNAME, "password": PASSWORD})))
}

pub fn session_response(session_id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "sessionId": session_id }))
}

pub fn success_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn error_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(body)
}
