//! CLI command implementations

pub mod locations;
pub mod stores;

use anyhow::{Context, Result};
use tgtg_api_client::TgtgClient;

/// Build a client from CLI credentials and `TGTG_*` environment configuration
pub fn connect(email: Option<String>, password: Option<String>) -> Result<TgtgClient> {
    let email = email.context("missing account email: pass --email or set TGTG_EMAIL")?;
    let password =
        password.context("missing account password: pass --password or set TGTG_PASSWORD")?;

    TgtgClient::new(email, password).context("failed to configure API client")
}

/// Horizontal rule used by the text output
pub(crate) const RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
