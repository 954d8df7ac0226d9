//! Client for the surplus-food marketplace API
//!
//! This crate authenticates a user, resolves free-text locations into
//! coordinates, and searches stores offering surplus food around a point.
//!
//! # Features
//!
//! - **Single-flight authentication**: concurrent calls share one login or refresh
//! - **Token caching**: tokens are reused until shortly before they expire
//! - **Configurable renewal**: refresh-then-login or always-login
//! - **Typed errors**: bad credentials, transport failures, rejected requests
//!   and unexpected payloads are distinct [`ApiError`] variants
//! - **Request correlation**: every request carries a unique `X-Request-ID`
//!
//! # Example
//!
//! ```rust,no_run
//! use tgtg_api_client::{ClientConfig, Coordinates, TgtgClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TgtgClient::with_config("me@example.com", "secret", ClientConfig::default())?;
//!
//!     let places = client.find_locations("Amsterdam").await?;
//!     let center = places.first().map_or(Coordinates::new(52.37, 4.89), |p| p.coordinates);
//!
//!     for store in client.find_stores(center, 5.0).await? {
//!         println!("{} ({:.1} km)", store.name, store.distance);
//!     }
//!
//!     client.close();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod client;
pub mod config;
pub mod dispatcher;
#[allow(missing_docs)]
pub mod endpoints;
pub mod error;
pub mod models;

pub use client::TgtgClient;
pub use config::{ClientConfig, Endpoints, RenewalStrategy};
pub use error::{ApiError, ApiResult};
pub use models::{Address, Coordinates, Location, Store};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::auth::{Authenticator, Clock, Credentials, Token, TokenProvider};
    pub use crate::client::TgtgClient;
    pub use crate::config::{ClientConfig, RenewalStrategy};
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::models::{Address, Coordinates, Location, Store};
}
