//! [`Authenticator`] backed by the auth endpoints

use super::{Authenticator, Clock, Credentials, Token};
use crate::config::{ClientConfig, Endpoints};
use crate::dispatcher::Dispatcher;
use crate::endpoints::auth::{AuthResponse, LoginRequest, RefreshRequest};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Logs in and refreshes through the configured auth endpoints
///
/// Neither call carries a bearer token.
pub struct HttpAuthenticator {
    dispatcher: Dispatcher,
    endpoints: Endpoints,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl HttpAuthenticator {
    /// Create an authenticator sharing `dispatcher`'s transport
    pub fn new(dispatcher: Dispatcher, config: &ClientConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            dispatcher,
            endpoints: config.endpoints.clone(),
            default_ttl: config.default_token_ttl,
            clock,
        }
    }

    async fn exchange<B: serde::Serialize + Sync>(&self, endpoint: &str, body: &B) -> ApiResult<Token> {
        let response: AuthResponse = self
            .dispatcher
            .post(endpoint, body, None)
            .await
            .map_err(ApiError::into_auth_error)?;

        let token = response
            .into_token(self.clock.now(), self.default_ttl)
            .map_err(|reason| ApiError::authentication(endpoint, None, reason))?;

        debug!(
            user_id = token.user_id(),
            expires_at = %token.expires_at(),
            "Token issued"
        );
        Ok(token)
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    #[instrument(skip_all, fields(endpoint = %self.endpoints.login))]
    async fn login(&self, credentials: &Credentials) -> ApiResult<Token> {
        self.exchange(&self.endpoints.login, &LoginRequest::new(credentials))
            .await
    }

    #[instrument(skip_all, fields(endpoint = %self.endpoints.refresh))]
    async fn refresh(&self, refresh_token: &str) -> ApiResult<Token> {
        self.exchange(&self.endpoints.refresh, &RefreshRequest { refresh_token })
            .await
    }
}

impl std::fmt::Debug for HttpAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAuthenticator")
            .field("endpoints", &self.endpoints)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
