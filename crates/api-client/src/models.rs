//! Domain values returned to callers
//!
//! These are plain projections of the server's response DTOs. They carry no
//! identity beyond field equality.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude
    pub latitude: f64,
    /// Longitude
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// A named place found by location search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Display name
    pub name: String,
    /// Where it is
    pub coordinates: Coordinates,
}

/// Pickup address of a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Street line
    pub address_line: String,
    /// City
    pub city: String,
    /// Postal code
    pub postcode: String,
    /// Pickup point coordinates
    pub coordinates: Coordinates,
}

/// A vendor offering surplus food for pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Upstream store id
    pub id: String,
    /// Store name
    pub name: String,
    /// Description of the offered item, when the store provides one
    pub description: Option<String>,
    /// Store website, when known
    pub website: Option<String>,
    /// Distance from the search center, in km
    pub distance: f64,
    /// Whether the user has favourited the store
    pub favourited: bool,
    /// Pickup address
    pub address: Address,
}
