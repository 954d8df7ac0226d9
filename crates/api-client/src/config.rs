//! Configuration for the marketplace API client
//!
//! Supports environment-based configuration with sensible defaults.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default production API URL
const DEFAULT_API_URL: &str = "https://apptoogoodtogo.com/api/";

/// Default user agent sent with every request
const DEFAULT_USER_AGENT: &str = concat!("tgtg-api-client/", env!("CARGO_PKG_VERSION"));

/// How an expired token is renewed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalStrategy {
    /// Use the refresh token; log in again only if the refresh fails
    #[default]
    RefreshThenLogin,
    /// Always log in again with the stored credentials
    AlwaysLogin,
}

impl RenewalStrategy {
    /// Parse from a config string (`refresh` or `login`)
    pub fn parse(value: &str) -> ApiResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "refresh" | "refresh_then_login" => Ok(Self::RefreshThenLogin),
            "login" | "always_login" => Ok(Self::AlwaysLogin),
            other => Err(ApiError::config(format!(
                "unknown renewal strategy '{other}' (expected 'refresh' or 'login')"
            ))),
        }
    }
}

/// Endpoint paths, relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Email/password login
    pub login: String,
    /// Refresh-token exchange
    pub refresh: String,
    /// Location search
    pub locations: String,
    /// Nearby store search
    pub stores: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "auth/v3/authByEmail".to_string(),
            refresh: "auth/v3/token/refresh".to_string(),
            locations: "location/v1/search".to_string(),
            stores: "item/v7/".to_string(),
        }
    }
}

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every endpoint path is resolved against
    pub base_url: String,
    /// Request timeout, enforced by the transport
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    /// User agent header value
    pub user_agent: String,
    /// A token is renewed this long before its literal expiry
    #[serde(with = "duration_secs")]
    pub refresh_margin: Duration,
    /// Lifetime assumed when the auth response carries no TTL
    #[serde(with = "duration_secs")]
    pub default_token_ttl: Duration,
    /// How expired tokens are renewed
    pub renewal: RenewalStrategy,
    /// Endpoint paths
    pub endpoints: Endpoints,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            refresh_margin: Duration::from_secs(60),
            default_token_ttl: Duration::from_secs(3600),
            renewal: RenewalStrategy::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `TGTG_API_URL`: Base URL for all endpoints
    /// - `TGTG_TIMEOUT_SECS`: Request timeout in seconds
    /// - `TGTG_REFRESH_MARGIN_SECS`: Renew tokens this many seconds before expiry
    /// - `TGTG_RENEWAL`: `refresh` (default) or `login`
    pub fn from_env() -> ApiResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = env::var("TGTG_API_URL") {
            config.base_url = url;
        }

        if let Some(timeout) = secs_from_env("TGTG_TIMEOUT_SECS") {
            config.timeout = timeout;
        }

        if let Some(margin) = secs_from_env("TGTG_REFRESH_MARGIN_SECS") {
            config.refresh_margin = margin;
        }

        if let Ok(renewal) = env::var("TGTG_RENEWAL") {
            config.renewal = RenewalStrategy::parse(&renewal)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder-style method to set the user agent
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builder-style method to set the refresh margin
    #[must_use]
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// Builder-style method to set the fallback token lifetime
    #[must_use]
    pub fn with_default_token_ttl(mut self, ttl: Duration) -> Self {
        self.default_token_ttl = ttl;
        self
    }

    /// Builder-style method to set the renewal strategy
    #[must_use]
    pub fn with_renewal(mut self, renewal: RenewalStrategy) -> Self {
        self.renewal = renewal;
        self
    }

    /// Builder-style method to set endpoint paths
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Resolve an endpoint path against the base URL
    #[must_use]
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.base_url.is_empty() {
            return Err(ApiError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::InvalidUrl(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self.timeout.is_zero() {
            return Err(ApiError::config("timeout cannot be zero"));
        }

        if self.default_token_ttl <= self.refresh_margin {
            return Err(ApiError::config(
                "default_token_ttl must be longer than refresh_margin",
            ));
        }

        let endpoints = &self.endpoints;
        for (name, path) in [
            ("login", &endpoints.login),
            ("refresh", &endpoints.refresh),
            ("locations", &endpoints.locations),
            ("stores", &endpoints.stores),
        ] {
            if path.trim().is_empty() {
                return Err(ApiError::config(format!("{name} endpoint cannot be empty")));
            }
        }

        Ok(())
    }
}

fn secs_from_env(var: &str) -> Option<Duration> {
    env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
}
