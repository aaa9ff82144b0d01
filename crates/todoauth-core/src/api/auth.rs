//! Registration and login against the todo service.
//!
//! Both endpoints take the same `{"username", "password"}` JSON body and
//! answer with a `{"data": ...}` envelope: the created user for `/register`,
//! the bare token string for `/login`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use super::client::RawResponse;
use super::resource::TODOS_PATH;
use super::{ApiClient, ApiError, ResourceClient};
use crate::auth::TokenStore;
use crate::models::{AuthFailure, AuthResult, Credentials, FailureKind, LoginOutcome};
use crate::utils::mask_token;

pub const REGISTER_PATH: &str = "/register";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct RegisteredUser {
    username: String,
}

impl From<ApiError> for AuthFailure {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(transport) => transport.into(),
            ApiError::Rejected { status, body } => {
                AuthFailure::new(FailureKind::Rejected { status }, body)
            }
            ApiError::InvalidResponse(detail) => {
                AuthFailure::new(FailureKind::MalformedResponse, detail)
            }
        }
    }
}

#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
    resources: ResourceClient,
}

impl AuthClient {
    pub fn new(api: ApiClient, tokens: Arc<dyn TokenStore>, resources: ResourceClient) -> Self {
        Self {
            api,
            tokens,
            resources,
        }
    }

    /// Create an account.
    ///
    /// Every failure (unreachable server, rejected username, unexpected
    /// payload) comes back as `TransportFailure`; the `FailureKind` inside
    /// says which.
    pub async fn register(&self, creds: &Credentials) -> AuthResult {
        debug!(username = %creds.username, "Submitting registration");

        let parsed = self
            .submit::<RegisteredUser>(REGISTER_PATH, creds)
            .await;

        match parsed {
            Ok(user) => {
                info!(username = %user.username, "Registered user");
                AuthResult::Registered {
                    username: user.username,
                }
            }
            Err(err) => {
                warn!(error = %err, "Registration failed");
                AuthResult::TransportFailure(err.into())
            }
        }
    }

    /// Log in, store the token, then load the protected todo list.
    ///
    /// The fetch is only issued after the token write has completed, and not
    /// at all if the login or the write failed.
    pub async fn login(&self, creds: &Credentials) -> LoginOutcome {
        debug!(username = %creds.username, "Submitting login");

        let token = match self.submit::<String>(LOGIN_PATH, creds).await {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "Login failed");
                return LoginOutcome::failed(err.into());
            }
        };

        if let Err(e) = self.tokens.save(&token) {
            error!(error = %e, "Failed to store login token");
            return LoginOutcome::failed(AuthFailure::new(FailureKind::Storage, format!("{:#}", e)));
        }
        info!(username = %creds.username, token = %mask_token(&token), "Logged in, token stored");

        let protected = self.resources.fetch_protected(TODOS_PATH).await;

        LoginOutcome {
            auth: AuthResult::LoggedIn { token },
            protected: Some(protected),
        }
    }

    async fn submit<T: DeserializeOwned>(
        &self,
        path: &str,
        creds: &Credentials,
    ) -> Result<T, ApiError> {
        let response = self.api.post_json(path, creds).await?;
        Self::parse_data(&response)
    }

    /// Pull `data` out of the response envelope.
    ///
    /// The status code is not consulted when the envelope parses; it only
    /// decides how a parse failure is reported.
    fn parse_data<T: DeserializeOwned>(response: &RawResponse) -> Result<T, ApiError> {
        match serde_json::from_str::<Envelope<T>>(&response.body) {
            Ok(envelope) => Ok(envelope.data),
            Err(_) if !response.status.is_success() => {
                Err(ApiError::from_status(response.status, &response.body))
            }
            Err(e) => Err(ApiError::InvalidResponse(e.to_string())),
        }
    }
}
