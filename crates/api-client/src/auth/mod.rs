//! Authentication: credentials, tokens and the single-flight token provider
//!
//! A [`TokenProvider`] owns the user's [`Credentials`] and the cached
//! [`Token`]. Every authenticated call asks it for a token; it logs in or
//! refreshes only when the cached token is missing or about to expire, and
//! concurrent callers share a single renewal.

mod http;
mod provider;
mod store;

pub use http::HttpAuthenticator;
pub use provider::TokenProvider;
pub use store::TokenStore;

use crate::error::ApiResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Email/password pair used to log in
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Account email
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Account password
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// An access token together with the identity it was issued for
///
/// Tokens are immutable; renewal produces a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    access_token: String,
    refresh_token: Option<String>,
    user_id: String,
    expires_at: DateTime<Utc>,
}

impl Token {
    /// Create a token
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        user_id: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            user_id: user_id.into(),
            expires_at,
        }
    }

    /// Bearer credential for business calls
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Refresh token, if the server issued one
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// User the token belongs to
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Literal expiry
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token is still usable at `now`, keeping `margin` in reserve
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        chrono::Duration::from_std(margin)
            .ok()
            .and_then(|margin| now.checked_add_signed(margin))
            .is_some_and(|deadline| deadline < self.expires_at)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[redacted]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[redacted]"),
            )
            .field("user_id", &self.user_id)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of the current time, used for token expiry
pub trait Clock: Send + Sync + 'static {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Performs the network side of authentication
#[async_trait]
pub trait Authenticator: Send + Sync + 'static {
    /// Log in with email and password
    async fn login(&self, credentials: &Credentials) -> ApiResult<Token>;

    /// Exchange a refresh token for a new token
    async fn refresh(&self, refresh_token: &str) -> ApiResult<Token>;
}
