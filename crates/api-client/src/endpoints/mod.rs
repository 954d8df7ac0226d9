//! Wire-level request/response types for each backend endpoint
//!
//! | Module | Default path | Description |
//! |--------|--------------|-------------|
//! | `auth` | `auth/v3/authByEmail`, `auth/v3/token/refresh` | Login and token refresh |
//! | `locations` | `location/v1/search` | Free-text location search |
//! | `stores` | `item/v7/` | Stores with surplus offers around a point |
//!
//! Each module also converts its DTOs into the domain types in
//! [`crate::models`].

pub mod auth;
pub mod locations;
pub mod stores;

use crate::models::Coordinates;
use serde::{Deserialize, Serialize};

/// Latitude/longitude object as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoPoint> for Coordinates {
    fn from(point: GeoPoint) -> Self {
        Coordinates::new(point.latitude, point.longitude)
    }
}

impl From<Coordinates> for GeoPoint {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        }
    }
}
