//! Main API client implementation

use crate::auth::{Clock, Credentials, HttpAuthenticator, SystemClock, TokenProvider};
use crate::config::ClientConfig;
use crate::dispatcher::Dispatcher;
use crate::endpoints::locations::{LocationRequest, LocationResponse};
use crate::endpoints::stores::{StoreRequest, StoreResponse};
use crate::error::{ApiError, ApiResult};
use crate::models::{Coordinates, Location, Store};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, instrument};

/// Marketplace API client
///
/// Composes a [`TokenProvider`] and a [`Dispatcher`]: every call obtains a
/// valid token first, then performs a single POST with it. Clones share the
/// same session (cached token, transport, closed state).
#[derive(Clone)]
pub struct TgtgClient {
    dispatcher: Dispatcher,
    tokens: TokenProvider,
    config: Arc<ClientConfig>,
    closed: Arc<AtomicBool>,
}

impl TgtgClient {
    /// Create a new client with configuration from environment
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(email, password, config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(
        email: impl Into<String>,
        password: impl Into<String>,
        config: ClientConfig,
    ) -> ApiResult<Self> {
        config.validate()?;

        let config = Arc::new(config);
        let dispatcher = Dispatcher::new(Arc::clone(&config))?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let authenticator = Arc::new(HttpAuthenticator::new(
            dispatcher.clone(),
            &config,
            Arc::clone(&clock),
        ));
        let tokens = TokenProvider::with_clock(
            Credentials::new(email, password),
            authenticator,
            clock,
            &config,
        );

        Ok(Self {
            dispatcher,
            tokens,
            config,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The token provider backing this client
    #[must_use]
    pub fn token_provider(&self) -> &TokenProvider {
        &self.tokens
    }

    /// Search locations matching a free-text query, in server order
    #[instrument(skip(self))]
    pub async fn find_locations(&self, query: &str) -> ApiResult<Vec<Location>> {
        let response: LocationResponse = self
            .post(&self.config.endpoints.locations, &LocationRequest::new(query))
            .await?;

        debug!(count = response.results.len(), "Locations found");
        Ok(response.results.into_iter().map(Location::from).collect())
    }

    /// Find stores within `radius_km` of `center`
    #[instrument(skip(self), fields(lat = center.latitude, lon = center.longitude))]
    pub async fn find_stores(&self, center: Coordinates, radius_km: f64) -> ApiResult<Vec<Store>> {
        self.ensure_open()?;

        // The same token supplies both the user id in the body and the bearer.
        let token = self.tokens.token().await?;
        self.ensure_open()?;
        let request = StoreRequest::new(token.user_id(), center, radius_km);
        let response: StoreResponse = self
            .dispatcher
            .post(
                &self.config.endpoints.stores,
                &request,
                Some(token.access_token()),
            )
            .await?;

        debug!(count = response.items.len(), "Stores found");
        Ok(response.items.into_iter().map(Store::from).collect())
    }

    /// Discard the cached token and refuse further calls.
    ///
    /// Performs no network call and may be called any number of times. The
    /// transport is released when the last clone is dropped.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.tokens.invalidate();
        info!("Client closed");
    }

    /// Whether [`close`](Self::close) has been called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> ApiResult<()> {
        if self.is_closed() {
            Err(ApiError::Closed)
        } else {
            Ok(())
        }
    }

    /// Authenticated POST to a business endpoint
    async fn post<B, T>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.ensure_open()?;
        let token = self.tokens.token().await?;
        // Closed while the token was being obtained.
        self.ensure_open()?;
        self.dispatcher
            .post(endpoint, body, Some(token.access_token()))
            .await
    }
}

impl std::fmt::Debug for TgtgClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TgtgClient")
            .field("base_url", &self.config.base_url)
            .field("tokens", &self.tokens)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
