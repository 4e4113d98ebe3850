use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session lifetime in hours.
/// ServiceTrade sessions expire 24 hours after they are issued.
const SESSION_EXPIRY_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: String,
    pub auth_token: Option<String>,
    pub user_info: Option<Value>,
    pub issued_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            auth_token: None,
            user_info: None,
            issued_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at > Duration::hours(SESSION_EXPIRY_HOURS)
    }

    pub fn time_until_expiry(&self) -> Duration {
        let expiry = self.issued_at + Duration::hours(SESSION_EXPIRY_HOURS);
        expiry - Utc::now()
    }
}

/// Where the session lifecycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Authenticating,
    Active,
    Expired,
}

#[derive(Debug, Default)]
pub struct Session {
    pub data: Option<SessionData>,
    authenticating: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        if self.authenticating {
            return SessionState::Authenticating;
        }
        match self.data {
            None => SessionState::NoSession,
            Some(ref data) if data.is_expired() => SessionState::Expired,
            Some(_) => SessionState::Active,
        }
    }

    pub(crate) fn begin_authentication(&mut self) {
        self.authenticating = true;
    }

    pub(crate) fn end_authentication(&mut self) {
        self.authenticating = false;
    }

    /// Clear session data
    pub fn clear(&mut self) {
        self.data = None;
        self.authenticating = false;
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
        self.authenticating = false;
    }

    /// Session id if the session is still valid
    pub fn session_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .filter(|d| !d.is_expired())
            .map(|d| d.session_id.as_str())
    }

    /// Check if session is valid (exists and not expired)
    pub fn is_valid(&self) -> bool {
        self.session_id().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_is_active() {
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::NoSession);

        session.update(SessionData::new("abc"));
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.session_id(), Some("abc"));
    }

    #[test]
    fn test_session_expires_after_24_hours() {
        let mut data = SessionData::new("abc");
        data.issued_at = Utc::now() - Duration::seconds(86_401);
        assert!(data.is_expired());

        let mut session = Session::new();
        session.update(data);
        assert_eq!(session.state(), SessionState::Expired);
        assert_eq!(session.session_id(), None);
        assert!(!session.is_valid());
    }

    #[test]
    fn test_session_at_boundary_is_not_expired() {
        let data = SessionData::new("abc");
        let boundary = data.issued_at + Duration::seconds(86_400);
        assert!(!data.is_expired_at(boundary));
        assert!(data.is_expired_at(boundary + Duration::seconds(1)));
    }

    #[test]
    fn test_authenticating_state_and_clear() {
        let mut session = Session::new();
        session.begin_authentication();
        assert_eq!(session.state(), SessionState::Authenticating);
        session.end_authentication();
        assert_eq!(session.state(), SessionState::NoSession);

        session.update(SessionData::new("abc"));
        session.clear();
        assert_eq!(session.state(), SessionState::NoSession);
    }

    #[test]
    fn test_time_until_expiry() {
        let data = SessionData::new("abc");
        let remaining = data.time_until_expiry();
        assert!(remaining <= Duration::hours(24));
        assert!(remaining > Duration::hours(23));
    }
}
