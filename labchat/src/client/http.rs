//! reqwest-backed client for the assistant service's `POST /chat`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use super::{AssistantClient, ChatReply, ChatRequest, ExchangeError};

/// Where the assistant service listens unless told otherwise.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Upper bound on one exchange, connection included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for [`HttpAssistantClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the service, without the `/chat` path.
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Full URL of the chat route.
    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.endpoint.trim_end_matches('/'))
    }
}

/// Talks JSON to the assistant service. Cookies set by the service are
/// kept and sent back on later requests.
#[derive(Debug, Clone)]
pub struct HttpAssistantClient {
    http: reqwest::Client,
    chat_url: String,
}

impl HttpAssistantClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            chat_url: config.chat_url(),
        })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

#[async_trait]
impl AssistantClient for HttpAssistantClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ExchangeError> {
        tracing::debug!(url = %self.chat_url, model = %request.model, "posting chat request");

        let resp = self
            .http
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            // An unreadable body is handled like an unparsable one.
            let body = resp.text().await.unwrap_or_default();
            return Err(ExchangeError::from_status(status.as_u16(), &body));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| ExchangeError::MalformedReply(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use axum::body::Body;
    use axum::http::{HeaderMap as AxumHeaders, Request, Response};
    use axum::{Json, Router};
    use tokio::net::TcpListener;

    use super::*;
    use crate::client::error::{MISSING_DETAIL, UNKNOWN_ERROR};
    use crate::models::ChatModel;

    async fn serve(app: Router) -> (String, tokio::sync::oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://127.0.0.1:{}", addr.port());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        (base_url, shutdown_tx)
    }

    async fn start_mock_assistant(
        status: u16,
        body: &'static str,
    ) -> (String, tokio::sync::oneshot::Sender<()>) {
        let route = axum::routing::post(move |_req: Request<Body>| async move {
            Ok::<_, Infallible>(
                Response::builder()
                    .status(status)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
        });
        serve(Router::new().route("/chat", route)).await
    }

    fn client_for(base_url: &str) -> HttpAssistantClient {
        HttpAssistantClient::new(&ClientConfig {
            endpoint: base_url.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn hello() -> ChatRequest {
        ChatRequest {
            message: "Hello".to_string(),
            model: ChatModel::DeepseekR1,
        }
    }

    #[test]
    fn chat_url_strips_trailing_slash() {
        let config = ClientConfig {
            endpoint: "http://localhost:8000/".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(config.chat_url(), "http://localhost:8000/chat");
    }

    #[tokio::test]
    async fn success_returns_response_field() {
        let (base_url, _shutdown) = start_mock_assistant(200, r#"{"response":"Hi there"}"#).await;

        let reply = client_for(&base_url).chat(&hello()).await.unwrap();

        assert_eq!(reply.response, "Hi there");
    }

    #[tokio::test]
    async fn sends_json_payload_and_accept_header() {
        let route = axum::routing::post(
            |headers: AxumHeaders, Json(body): Json<serde_json::Value>| async move {
                let accept = headers
                    .get("accept")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(serde_json::json!({
                    "response": format!("{}|{}|{}", body["message"], body["model"], accept)
                }))
            },
        );
        let (base_url, _shutdown) = serve(Router::new().route("/chat", route)).await;

        let request = ChatRequest {
            message: "Hello".to_string(),
            model: ChatModel::Claude3Haiku,
        };
        let reply = client_for(&base_url).chat(&request).await.unwrap();

        assert_eq!(
            reply.response,
            r#""Hello"|"claude-3-haiku"|application/json"#
        );
    }

    #[tokio::test]
    async fn cookies_set_by_service_are_sent_back() {
        let route = axum::routing::post(|headers: AxumHeaders| async move {
            let cookie = headers
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("none")
                .to_string();
            (
                [("set-cookie", "sid=abc; Path=/")],
                Json(serde_json::json!({ "response": cookie })),
            )
        });
        let (base_url, _shutdown) = serve(Router::new().route("/chat", route)).await;
        let client = client_for(&base_url);

        let first = client.chat(&hello()).await.unwrap();
        let second = client.chat(&hello()).await.unwrap();

        assert_eq!(first.response, "none");
        assert_eq!(second.response, "sid=abc");
    }

    #[tokio::test]
    async fn error_status_uses_detail() {
        let (base_url, _shutdown) = start_mock_assistant(500, r#"{"detail":"server error"}"#).await;

        let err = client_for(&base_url).chat(&hello()).await.unwrap_err();

        assert!(
            matches!(err, ExchangeError::Status { status: 500, .. }),
            "expected Status but got: {err:?}"
        );
        assert_eq!(err.user_message(), "server error");
    }

    #[tokio::test]
    async fn error_status_with_unparsable_body_falls_back() {
        let (base_url, _shutdown) = start_mock_assistant(503, "upstream unavailable").await;

        let err = client_for(&base_url).chat(&hello()).await.unwrap_err();

        assert_eq!(err.user_message(), UNKNOWN_ERROR);
    }

    #[tokio::test]
    async fn error_status_without_detail_uses_generic_text() {
        let (base_url, _shutdown) = start_mock_assistant(400, r#"{"message":"bad"}"#).await;

        let err = client_for(&base_url).chat(&hello()).await.unwrap_err();

        assert_eq!(err.user_message(), MISSING_DETAIL);
    }

    #[tokio::test]
    async fn success_without_response_field_is_malformed() {
        let (base_url, _shutdown) = start_mock_assistant(200, r#"{"answer":"Hi"}"#).await;

        let err = client_for(&base_url).chat(&hello()).await.unwrap_err();

        assert!(
            matches!(err, ExchangeError::MalformedReply(_)),
            "expected MalformedReply but got: {err:?}"
        );
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = client_for(&format!("http://127.0.0.1:{port}"))
            .chat(&hello())
            .await
            .unwrap_err();

        assert!(
            matches!(err, ExchangeError::Transport(_)),
            "expected Transport but got: {err:?}"
        );
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let route = axum::routing::post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(serde_json::json!({"response": "too late"}))
        });
        let (base_url, _shutdown) = serve(Router::new().route("/chat", route)).await;

        let client = HttpAssistantClient::new(&ClientConfig {
            endpoint: base_url,
            timeout: Duration::from_millis(200),
        })
        .unwrap();
        let err = client.chat(&hello()).await.unwrap_err();

        assert!(
            matches!(err, ExchangeError::Transport(_)),
            "expected Transport but got: {err:?}"
        );
    }
}
