//! Bearer-authenticated access to protected endpoints.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::ApiClient;
use crate::auth::TokenStore;
use crate::models::ResourceResult;
use crate::utils::truncate_string;

/// The protected endpoint loaded after every successful login.
pub const TODOS_PATH: &str = "/todos";

/// Maximum characters of a response body written to the log
const MAX_LOGGED_BODY_CHARS: usize = 500;

#[derive(Clone)]
pub struct ResourceClient {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
}

impl ResourceClient {
    pub fn new(api: ApiClient, tokens: Arc<dyn TokenStore>) -> Self {
        Self { api, tokens }
    }

    /// GET `path` with the stored token and classify the outcome.
    ///
    /// The request goes out even without a stored token (as `Bearer ` with an
    /// empty credential), so the server decides and the caller sees
    /// `Unauthorized` rather than a silent skip.
    pub async fn fetch_protected(&self, path: &str) -> ResourceResult {
        let token = self.current_token();

        let response = match self.api.get_with_bearer(path, &token).await {
            Ok(response) => response,
            Err(error) => {
                warn!(path = path, error = %error, "Unable to contact server");
                return ResourceResult::TransportFailure { error };
            }
        };

        let body = response.json_lenient();
        let preview = truncate_string(&body.to_string(), MAX_LOGGED_BODY_CHARS);

        if response.status.is_success() {
            info!(path = path, status = response.status.as_u16(), "Protected resource loaded");
            debug!("Todos: {}", preview);
            ResourceResult::Ok { body }
        } else {
            let status = response.status.as_u16();
            warn!(path = path, status = status, "Invalid response code");
            warn!(path = path, body = %preview, "Invalid response data");
            ResourceResult::Unauthorized { status, body }
        }
    }

    /// Load the todo list for the logged-in user.
    pub async fn fetch_todos(&self) -> ResourceResult {
        self.fetch_protected(TODOS_PATH).await
    }

    fn current_token(&self) -> String {
        match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No token stored, sending empty bearer credential");
                String::new()
            }
            Err(e) => {
                error!(error = %e, "Failed to read token store, sending empty bearer credential");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::{ClientSettings, TransportError};
    use crate::auth::MemoryTokenStore;

    fn resource_client(base_url: &str, tokens: Arc<dyn TokenStore>) -> ResourceClient {
        let api = ApiClient::new(&ClientSettings {
            base_url: base_url.to_string(),
            ..ClientSettings::default()
        })
        .unwrap();
        ResourceClient::new(api, tokens)
    }

    #[tokio::test]
    async fn test_ok_with_bearer_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .and(header("Authorization", "Bearer tok123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}])))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::with_token("tok123"));
        let result = resource_client(&server.uri(), tokens).fetch_todos().await;

        assert_eq!(result, ResourceResult::Ok { body: json!([{"id": 1}]) });
    }

    #[tokio::test]
    async fn test_unauthorized_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "bad token"})),
            )
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::with_token("expired"));
        let result = resource_client(&server.uri(), tokens)
            .fetch_protected("/todos")
            .await;

        assert_eq!(
            result,
            ResourceResult::Unauthorized {
                status: 401,
                body: json!({"error": "bad token"}),
            }
        );
        assert!(!result.is_ok());
    }

    #[tokio::test]
    async fn test_server_error_with_text_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::with_token("tok123"));
        let result = resource_client(&server.uri(), tokens)
            .fetch_protected("/todos")
            .await;

        assert_eq!(
            result,
            ResourceResult::Unauthorized {
                status: 500,
                body: json!("boom"),
            }
        );
    }

    #[tokio::test]
    async fn test_connection_drop_is_transport_failure() {
        // Bind then drop a listener so nothing is listening on its port
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let tokens = Arc::new(MemoryTokenStore::with_token("tok123"));
        let result = resource_client(&uri, tokens).fetch_protected("/todos").await;

        assert!(result.is_transport_failure());
        assert!(!result.is_unauthorized());
        assert!(matches!(
            result,
            ResourceResult::TransportFailure {
                error: TransportError::Connect(_) | TransportError::Request(_)
            }
        ));
    }

    /// Serve one response that promises more body than it sends, then hang up
    fn truncated_response_server(status_line: &'static str) -> String {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{{\"error\"",
                status_line
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        uri
    }

    #[tokio::test]
    async fn test_truncated_rejection_keeps_status() {
        let uri = truncated_response_server("HTTP/1.1 401 Unauthorized");
        let tokens = Arc::new(MemoryTokenStore::with_token("tok123"));
        let result = resource_client(&uri, tokens).fetch_protected("/todos").await;

        assert_eq!(
            result,
            ResourceResult::Unauthorized {
                status: 401,
                body: serde_json::Value::Null,
            }
        );
    }

    #[tokio::test]
    async fn test_truncated_success_is_transport_failure() {
        let uri = truncated_response_server("HTTP/1.1 200 OK");
        let tokens = Arc::new(MemoryTokenStore::with_token("tok123"));
        let result = resource_client(&uri, tokens).fetch_protected("/todos").await;

        assert!(result.is_transport_failure());
    }

    #[tokio::test]
    async fn test_request_sent_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "no token"})))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::new());
        let result = resource_client(&server.uri(), tokens)
            .fetch_protected("/todos")
            .await;

        assert!(result.is_unauthorized());

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let auth = requests[0]
            .headers
            .get("Authorization")
            .map(|v| v.to_str().unwrap().trim().to_string());
        assert_eq!(auth.as_deref(), Some("Bearer"));
    }

    #[tokio::test]
    async fn test_timeout_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(std::time::Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let api = ApiClient::new(&ClientSettings {
            base_url: server.uri(),
            timeout: std::time::Duration::from_millis(50),
        })
        .unwrap();
        let client = ResourceClient::new(api, Arc::new(MemoryTokenStore::with_token("tok123")));

        let result = client.fetch_protected("/todos").await;
        assert_eq!(
            result,
            ResourceResult::TransportFailure {
                error: TransportError::Timeout
            }
        );
    }
}
