//! Login and token refresh payloads

use crate::auth::{Credentials, Token};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Device type reported on login
const DEVICE_TYPE: &str = "ANDROID";

/// Email/password login body
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub device_type: &'static str,
    pub email: &'a str,
    pub password: &'a str,
}

impl<'a> LoginRequest<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        Self {
            device_type: DEVICE_TYPE,
            email: credentials.email(),
            password: credentials.password(),
        }
    }
}

/// Refresh-token exchange body
#[derive(Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("device_type", &self.device_type)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl fmt::Debug for RefreshRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshRequest")
            .field("refresh_token", &"[redacted]")
            .finish()
    }
}

/// Response of both login and refresh
#[derive(Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub access_token_ttl_seconds: Option<u64>,
    pub startup_data: StartupData,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("startup_data", &self.startup_data)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartupData {
    pub user: AuthUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
}

impl AuthResponse {
    /// Build a [`Token`] issued at `issued_at`.
    ///
    /// `default_ttl` applies when the server sends no TTL. Returns the reason
    /// when the payload cannot produce a usable token.
    pub fn into_token(self, issued_at: DateTime<Utc>, default_ttl: Duration) -> Result<Token, String> {
        if self.access_token.trim().is_empty() {
            return Err("auth response carries an empty access_token".to_string());
        }
        if self.startup_data.user.user_id.trim().is_empty() {
            return Err("auth response carries an empty user_id".to_string());
        }

        let ttl = self
            .access_token_ttl_seconds
            .map_or(default_ttl, Duration::from_secs);
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| format!("token ttl of {}s is out of range", ttl.as_secs()))?;

        Ok(Token::new(
            self.access_token,
            self.refresh_token.filter(|t| !t.is_empty()),
            self.startup_data.user.user_id,
            expires_at,
        ))
    }
}
