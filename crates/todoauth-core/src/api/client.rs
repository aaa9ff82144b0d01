//! Shared HTTP plumbing used by the auth and resource clients.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::TransportError;

/// Default server location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// HTTP request timeout in seconds.
/// The server never answering would otherwise leave a login hanging forever.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// A response that made it back from the server, body still unparsed.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    /// Parse the body as JSON, falling back to the raw text.
    /// An empty body becomes `null`.
    pub fn json_lenient(&self) -> Value {
        if self.body.trim().is_empty() {
            return Value::Null;
        }
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// POST a JSON body. `content-type: application/json` is set by reqwest.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RawResponse, TransportError> {
        let url = self.url(path);
        debug!(url = %url, "Sending POST request");

        let response = self.client.post(&url).json(body).send().await?;
        Self::read(response).await
    }

    /// GET with an `Authorization: Bearer <token>` header.
    /// An empty token is still sent, as `Bearer ` with no credential.
    pub async fn get_with_bearer(
        &self,
        path: &str,
        token: &str,
    ) -> Result<RawResponse, TransportError> {
        let url = self.url(path);
        let auth = header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| TransportError::InvalidToken)?;
        debug!(url = %url, has_token = !token.is_empty(), "Sending GET request");

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, auth)
            .send()
            .await?;
        Self::read(response).await
    }

    /// Read the body. A rejection whose body is cut off still reports its
    /// status, with an empty body; a cut-off success is a transport failure.
    async fn read(response: reqwest::Response) -> Result<RawResponse, TransportError> {
        let status = response.status();
        match response.text().await {
            Ok(body) => Ok(RawResponse { status, body }),
            Err(e) if !status.is_success() => {
                debug!(status = status.as_u16(), error = %e, "Failed to read rejection body");
                Ok(RawResponse {
                    status,
                    body: String::new(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&ClientSettings {
            base_url: base_url.to_string(),
            ..ClientSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_joining() {
        let api = client("http://localhost:4000/");
        assert_eq!(api.base_url(), "http://localhost:4000");
        assert_eq!(api.url("/todos"), "http://localhost:4000/todos");
        assert_eq!(api.url("login"), "http://localhost:4000/login");
    }

    #[test]
    fn test_json_lenient() {
        let parsed = RawResponse {
            status: StatusCode::OK,
            body: r#"{"a":1}"#.to_string(),
        };
        assert_eq!(parsed.json_lenient(), serde_json::json!({"a": 1}));

        let text = RawResponse {
            status: StatusCode::BAD_GATEWAY,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(text.json_lenient(), Value::String("Bad Gateway".to_string()));

        let empty = RawResponse {
            status: StatusCode::NO_CONTENT,
            body: String::new(),
        };
        assert_eq!(empty.json_lenient(), Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_token_is_not_sent() {
        let api = client("http://127.0.0.1:9");
        let err = api.get_with_bearer("/todos", "bad\ntoken").await.unwrap_err();
        assert_eq!(err, TransportError::InvalidToken);
    }
}
