//! Location search
//!
//! Resolves a free-text query ("Amsterdam Centraal") into named coordinates.

use super::GeoPoint;
use crate::models::Location;
use serde::{Deserialize, Serialize};

/// Location search body
#[derive(Debug, Clone, Serialize)]
pub struct LocationRequest<'a> {
    pub query: &'a str,
}

impl<'a> LocationRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self { query }
    }
}

/// Location search response
#[derive(Debug, Clone, Deserialize)]
pub struct LocationResponse {
    pub results: Vec<LocationResult>,
}

/// A single match
#[derive(Debug, Clone, Deserialize)]
pub struct LocationResult {
    pub name: String,
    pub location: GeoPoint,
}

impl From<LocationResult> for Location {
    fn from(result: LocationResult) -> Self {
        Self {
            name: result.name,
            coordinates: result.location.into(),
        }
    }
}
