//! Nearby store search
//!
//! The server answers with "item containers": an offered item wrapped together
//! with its store, pickup location and distance from the search origin.

use super::GeoPoint;
use crate::models::{Address, Coordinates, Store};
use serde::{Deserialize, Serialize};

/// Store search body
#[derive(Debug, Clone, Serialize)]
pub struct StoreRequest<'a> {
    pub user_id: &'a str,
    pub origin: GeoPoint,
    /// Search radius in km
    pub radius: f64,
}

impl<'a> StoreRequest<'a> {
    pub fn new(user_id: &'a str, center: Coordinates, radius_km: f64) -> Self {
        Self {
            user_id,
            origin: center.into(),
            radius: radius_km,
        }
    }
}

/// Store search response
#[derive(Debug, Clone, Deserialize)]
pub struct StoreResponse {
    pub items: Vec<StoreContainer>,
}

/// One offer with its store and pickup details
#[derive(Debug, Clone, Deserialize)]
pub struct StoreContainer {
    pub store: StoreInfo,
    pub item: ItemInfo,
    pub distance: f64,
    pub favorite: bool,
    pub pickup_location: PickupLocation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreInfo {
    pub store_id: String,
    pub store_name: String,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemInfo {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickupLocation {
    pub address: PickupAddress,
    pub location: GeoPoint,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickupAddress {
    pub address_line: String,
    pub city: String,
    pub postal_code: String,
}

impl From<StoreContainer> for Store {
    fn from(container: StoreContainer) -> Self {
        let StoreContainer {
            store,
            item,
            distance,
            favorite,
            pickup_location,
        } = container;

        Self {
            id: store.store_id,
            name: store.store_name,
            description: item.description,
            website: store.website,
            distance,
            favourited: favorite,
            address: Address {
                address_line: pickup_location.address.address_line,
                city: pickup_location.address.city,
                postcode: pickup_location.address.postal_code,
                coordinates: pickup_location.location.into(),
            },
        }
    }
}
