//! Nearby-pharmacy lookup.
//!
//! The places web service and device geolocation are collaborators behind
//! the [`PlacesService`] and [`Locator`] traits; this module owns the search
//! request, distance math, ordering, enrichment and the user-facing errors.

mod geo;
mod search;

pub use geo::*;
pub use search::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::LatLng;

/// Default search radius in metres.
pub const SEARCH_RADIUS_M: u32 = 5000;
/// Place type filter for nearby search.
pub const PHARMACY_PLACE_TYPE: &str = "pharmacy";
/// Keyword filter for nearby search.
pub const PHARMACY_KEYWORD: &str = "pharmacy medical store chemist";
/// Photo width requested during details enrichment.
pub const PHOTO_MAX_WIDTH: u32 = 400;
/// How many results the list view shows.
pub const DISPLAY_LIMIT: usize = 5;

/// Nearby search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbySearchRequest {
    pub location: LatLng,
    pub radius_m: u32,
    pub place_type: String,
    pub keyword: String,
}

impl NearbySearchRequest {
    /// Pharmacy search around a location.
    pub fn pharmacies(location: LatLng, radius_m: u32) -> Self {
        Self {
            location,
            radius_m,
            place_type: PHARMACY_PLACE_TYPE.to_string(),
            keyword: PHARMACY_KEYWORD.to_string(),
        }
    }
}

/// One nearby-search hit. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub vicinity: Option<String>,
    pub location: Option<LatLng>,
    pub rating: Option<f64>,
    pub open_now: Option<bool>,
    pub price_level: Option<u8>,
}

/// Place details used to enrich a selected pharmacy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub phone_number: Option<String>,
    pub weekday_text: Option<Vec<String>>,
    pub photo_urls: Option<Vec<String>>,
    pub website: Option<String>,
}

/// Places service failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacesError {
    #[error("no results")]
    ZeroResults,

    #[error("places service returned {status}: {message}")]
    Status { status: String, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("places API key is not configured")]
    MissingApiKey,
}

pub type PlacesResult<T> = Result<T, PlacesError>;

/// Nearby search and place details.
pub trait PlacesService {
    fn nearby_search(&self, request: &NearbySearchRequest) -> PlacesResult<Vec<PlaceSummary>>;

    /// Details for one place; photo URLs are sized to `photo_max_width`.
    fn place_details(&self, place_id: &str, photo_max_width: u32) -> PlacesResult<PlaceDetails>;
}

/// Geolocation request options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u32,
    pub maximum_age_ms: u32,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 0,
        }
    }
}

/// Geolocation failures, with their user-facing text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Geolocation is not supported by your browser")]
    Unsupported,

    #[error("Please enable location access in your browser settings")]
    PermissionDenied,

    #[error("Location information is unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("An unknown error occurred while getting your location")]
    Unknown,
}

impl GeolocationError {
    /// Map a numeric geolocation error code (1, 2, 3; anything else is unknown).
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            2 => GeolocationError::PositionUnavailable,
            3 => GeolocationError::Timeout,
            _ => GeolocationError::Unknown,
        }
    }
}

/// Device position source.
pub trait Locator {
    fn current_position(&self, options: &PositionOptions) -> Result<LatLng, GeolocationError>;
}

/// Pharmacy lookup errors. `Display` is the banner shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PharmacyError {
    #[error("Places service is not ready")]
    NotReady,

    #[error("Location not available")]
    NoLocation,

    #[error("No pharmacies found nearby")]
    NoResults,

    #[error("No pharmacies found nearby or API error occurred")]
    SearchFailed,

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

pub type PharmacyResult<T> = Result<T, PharmacyError>;
