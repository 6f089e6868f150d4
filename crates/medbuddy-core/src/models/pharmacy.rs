//! Pharmacy and coordinate models.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A pharmacy found near the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pharmacy {
    /// Place ID from the places service (generated if absent)
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: LatLng,
    /// Great-circle distance from the user in km, two decimals
    pub distance_km: f64,
    pub rating: Option<f64>,
    pub open_now: Option<bool>,
    pub price_level: Option<u8>,
    // Filled in by a details lookup
    pub phone_number: Option<String>,
    pub opening_hours: Option<Vec<String>>,
    pub photos: Option<Vec<String>>,
    pub website: Option<String>,
}

impl Pharmacy {
    /// Whether a details lookup has been merged into this record.
    pub fn has_details(&self) -> bool {
        self.phone_number.is_some() || self.opening_hours.is_some() || self.photos.is_some()
    }
}
