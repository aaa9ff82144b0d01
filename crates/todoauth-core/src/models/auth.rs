use std::fmt;

use serde::Serialize;

use super::ResourceResult;
use crate::api::TransportError;

/// Coarse message shown for any registration or login failure.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Username/password pair as submitted to `/register` and `/login`.
///
/// Serializes to exactly the wire body the server expects:
/// `{"username": "...", "password": "..."}`.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs and panic messages
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Fine-grained reason behind a failed register/login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// No response was received (DNS, refused connection, dropped socket)
    Unreachable,
    /// The configured request timeout elapsed
    Timeout,
    /// The server answered with a non-success status and no usable payload
    Rejected { status: u16 },
    /// The server answered with a success status but the payload was not understood
    MalformedResponse,
    /// The token was received but could not be written to the token store
    Storage,
}

/// Failure details for register/login.
///
/// Callers that only need the coarse view use [`AuthFailure::message`], which
/// is always "Server error". [`AuthFailure::kind`] exposes the structured code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFailure {
    kind: FailureKind,
    detail: String,
}

impl AuthFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn message(&self) -> &'static str {
        SERVER_ERROR_MESSAGE
    }
}

impl From<TransportError> for AuthFailure {
    fn from(err: TransportError) -> Self {
        let kind = match err {
            TransportError::Timeout => FailureKind::Timeout,
            _ => FailureKind::Unreachable,
        };
        Self::new(kind, err.to_string())
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message(), self.detail)
    }
}

/// Outcome of a registration or login request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Registered { username: String },
    LoggedIn { token: String },
    TransportFailure(AuthFailure),
}

impl AuthResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, AuthResult::TransportFailure(_))
    }

    pub fn failure(&self) -> Option<&AuthFailure> {
        match self {
            AuthResult::TransportFailure(failure) => Some(failure),
            _ => None,
        }
    }

    /// The status line shown to the user after submitting the form.
    pub fn message(&self) -> String {
        match self {
            AuthResult::Registered { username } => format!("Registered user:{}", username),
            AuthResult::LoggedIn { token } => format!("Logged In, got token:{}", token),
            AuthResult::TransportFailure(failure) => failure.message().to_string(),
        }
    }
}

/// Result of a login, including the protected fetch it triggers.
///
/// `protected` is `Some` only when the login succeeded and the token was
/// stored; the fetch is never issued otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub auth: AuthResult,
    pub protected: Option<ResourceResult>,
}

impl LoginOutcome {
    pub fn failed(failure: AuthFailure) -> Self {
        Self {
            auth: AuthResult::TransportFailure(failure),
            protected: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match self.auth {
            AuthResult::LoggedIn { ref token } => Some(token.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_credentials_wire_shape() {
        let creds = Credentials::new("alice", "secret");
        let value = serde_json::to_value(&creds).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"username": "alice", "password": "secret"})
        );
    }

    #[test]
    fn test_auth_result_messages() {
        let registered = AuthResult::Registered {
            username: "alice".to_string(),
        };
        assert_eq!(registered.message(), "Registered user:alice");

        let logged_in = AuthResult::LoggedIn {
            token: "tok123".to_string(),
        };
        assert_eq!(logged_in.message(), "Logged In, got token:tok123");

        let failed = AuthResult::TransportFailure(AuthFailure::new(
            FailureKind::Rejected { status: 409 },
            "username taken",
        ));
        assert_eq!(failed.message(), "Server error");
        assert!(!failed.is_success());
    }

    #[test]
    fn test_failure_kind_from_transport_error() {
        let timeout: AuthFailure = TransportError::Timeout.into();
        assert_eq!(timeout.kind(), &FailureKind::Timeout);

        let refused: AuthFailure = TransportError::Connect("refused".to_string()).into();
        assert_eq!(refused.kind(), &FailureKind::Unreachable);
        assert_eq!(refused.message(), SERVER_ERROR_MESSAGE);
    }
}
