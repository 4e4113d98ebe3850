use thiserror::Error;

/// Every failure the client can report.
///
/// Callers can match a single variant or treat the whole enum as one error
/// kind via `?`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    NotFound(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown HTTP method: {0}")]
    UnsupportedMethod(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl Error {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Classify a non-success response.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => Error::Authentication(format!(
                "Invalid credentials or expired session {}",
                truncated
            )),
            403 => Error::Authorization("Not authorized to perform this action".to_string()),
            404 => Error::NotFound("Resource not found".to_string()),
            code => Error::Api {
                status: code,
                body: truncated,
            },
        }
    }

    /// HTTP status associated with this error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authorization(_) => Some(403),
            Error::NotFound(_) => Some(404),
            Error::Api { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Error::Authentication(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidResponse(e.to_string())
    }
}
