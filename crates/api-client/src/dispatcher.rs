//! Single authenticated POST round trips
//!
//! The dispatcher owns the `reqwest` client. It knows nothing about tokens
//! beyond attaching the one it is given.

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Span, debug, instrument};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Performs one JSON POST per call: no caching, no retry
#[derive(Clone)]
pub struct Dispatcher {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl Dispatcher {
    /// Build the underlying HTTP client from configuration
    pub fn new(config: Arc<ClientConfig>) -> ApiResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ApiError::config("user_agent is not a valid header value"))?;
        default_headers.insert(USER_AGENT, user_agent);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| ApiError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { inner, config })
    }

    /// Configuration the dispatcher was built with
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST `body` to `endpoint` and decode the response.
    ///
    /// `endpoint` is resolved against the base URL. When `bearer` is given it
    /// is sent as `Authorization: Bearer <token>`.
    #[instrument(skip(self, body, bearer), fields(request_id))]
    pub async fn post<B, T>(&self, endpoint: &str, body: &B, bearer: Option<&str>) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let url = self.config.url_for(endpoint);
        let mut request = self
            .inner
            .post(&url)
            .header(X_REQUEST_ID, &request_id)
            .json(body);

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let start = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::network(endpoint, e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::network(endpoint, e))?;

        debug!(
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis(),
            bytes = text.len(),
            "Response received"
        );

        if !status.is_success() {
            return Err(ApiError::request_failed(endpoint, status.as_u16(), text));
        }

        serde_json::from_str(&text).map_err(|e| ApiError::decode(endpoint, e))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Echo {
        ok: bool,
    }

    fn dispatcher_for(url: &str) -> Dispatcher {
        let config = ClientConfig::default().with_base_url(url);
        Dispatcher::new(Arc::new(config)).unwrap()
    }

    #[test]
    fn test_invalid_user_agent_is_rejected() {
        let config = ClientConfig::default().with_user_agent("bad\nagent");
        assert!(matches!(
            Dispatcher::new(Arc::new(config)),
            Err(ApiError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_post_attaches_bearer_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/echo")
            .match_header("authorization", "Bearer token-1")
            .match_header("content-type", "application/json")
            .match_header("x-request-id", Matcher::Any)
            .match_body(Matcher::Json(json!({ "hello": "world" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "ok": true }"#)
            .create_async()
            .await;

        let dispatcher = dispatcher_for(&server.url());
        let echo: Echo = dispatcher
            .post("echo", &json!({ "hello": "world" }), Some("token-1"))
            .await
            .unwrap();

        assert!(echo.ok);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_without_bearer_sends_no_authorization() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/echo")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{ "ok": true }"#)
            .create_async()
            .await;

        let dispatcher = dispatcher_for(&server.url());
        let _: Echo = dispatcher.post("echo", &json!({}), None).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_request_failed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/echo")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let dispatcher = dispatcher_for(&server.url());
        let err = dispatcher
            .post::<_, Echo>("echo", &json!({}), Some("t"))
            .await
            .unwrap_err();

        match err {
            ApiError::RequestFailed {
                endpoint,
                status,
                body,
            } => {
                assert_eq!(endpoint, "echo");
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unexpected_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/echo")
            .with_status(200)
            .with_body(r#"{ "unexpected": 1 }"#)
            .create_async()
            .await;

        let dispatcher = dispatcher_for(&server.url());
        let err = dispatcher
            .post::<_, Echo>("echo", &json!({}), Some("t"))
            .await
            .unwrap_err();

        assert!(err.is_decode_error());
        assert_eq!(err.endpoint(), Some("echo"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let dispatcher = dispatcher_for("http://127.0.0.1:1");
        let err = dispatcher
            .post::<_, Echo>("echo", &json!({}), None)
            .await
            .unwrap_err();

        assert!(err.is_network_error());
    }
}
