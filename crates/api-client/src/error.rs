//! Error types for the API client

use std::sync::Arc;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
///
/// Errors are `Clone` because a single token renewal can fail on behalf of
/// many waiting callers; each of them receives the same error value.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// Login or refresh was rejected, or the auth payload was unusable
    #[error("Authentication failed at {endpoint}{}: {reason}", status_suffix(.status))]
    AuthenticationFailed {
        /// Auth endpoint that was called
        endpoint: String,
        /// HTTP status, when the server answered
        status: Option<u16>,
        /// What went wrong
        reason: String,
    },

    /// The transport failed before a response was received (timeouts included)
    #[error("Network error calling {endpoint}: {source}")]
    Network {
        /// Endpoint that was called
        endpoint: String,
        /// Underlying transport error
        #[source]
        source: Arc<reqwest::Error>,
    },

    /// A business endpoint answered with a non-success status
    #[error("Request to {endpoint} failed ({status}): {body}")]
    RequestFailed {
        /// Endpoint that was called
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        /// Endpoint that was called
        endpoint: String,
        /// Underlying JSON error
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The client was closed
    #[error("Client is closed")]
    Closed,

    /// The background token renewal did not run to completion
    #[error("Token renewal aborted: {0}")]
    RenewalAborted(String),
}

#[allow(clippy::ref_option)]
fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an authentication error
    pub fn authentication(
        endpoint: impl Into<String>,
        status: Option<u16>,
        reason: impl Into<String>,
    ) -> Self {
        Self::AuthenticationFailed {
            endpoint: endpoint.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Create a network error
    pub fn network(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            source: Arc::new(source),
        }
    }

    /// Create a failed-request error
    pub fn request_failed(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::RequestFailed {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            source: Arc::new(source),
        }
    }

    /// Re-classify a failed auth call.
    ///
    /// Rejections and unreadable payloads become [`ApiError::AuthenticationFailed`];
    /// transport failures stay [`ApiError::Network`].
    #[must_use]
    pub fn into_auth_error(self) -> Self {
        match self {
            Self::RequestFailed {
                endpoint,
                status,
                body,
            } => Self::authentication(endpoint, Some(status), body),
            Self::Decode { endpoint, source } => {
                Self::authentication(endpoint, None, format!("malformed auth payload: {source}"))
            }
            other => other,
        }
    }

    /// Endpoint the error relates to, if any
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::AuthenticationFailed { endpoint, .. }
            | Self::Network { endpoint, .. }
            | Self::RequestFailed { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(endpoint),
            Self::Config(_) | Self::InvalidUrl(_) | Self::Closed | Self::RenewalAborted(_) => None,
        }
    }

    /// HTTP status carried by the error, if any
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::AuthenticationFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Bad credentials or a rejected login/refresh
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// Transport-level failure
    #[must_use]
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Transport timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network { source, .. } if source.is_timeout())
    }

    /// Unexpected response shape
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}
