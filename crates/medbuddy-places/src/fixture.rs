//! Canned responses for running the pharmacy finder without the network.

use std::collections::HashMap;

use medbuddy_core::pharmacy::{
    NearbySearchRequest, PlaceDetails, PlaceSummary, PlacesError, PlacesResult, PlacesService,
};

use crate::request::{photo_url, DEFAULT_BASE_URL};
use crate::response::{parse_nearby_search, parse_place_details};

/// Places service backed by stored response bodies.
///
/// Bodies go through the same parsers as live responses.
#[derive(Debug, Clone, Default)]
pub struct FixturePlaces {
    nearby: Option<String>,
    details: HashMap<String, String>,
}

impl FixturePlaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body returned for every nearby search.
    pub fn with_nearby(mut self, json: impl Into<String>) -> Self {
        self.nearby = Some(json.into());
        self
    }

    /// Body returned for details of `place_id`.
    pub fn with_details(mut self, place_id: impl Into<String>, json: impl Into<String>) -> Self {
        self.details.insert(place_id.into(), json.into());
        self
    }
}

impl PlacesService for FixturePlaces {
    fn nearby_search(&self, request: &NearbySearchRequest) -> PlacesResult<Vec<PlaceSummary>> {
        tracing::debug!(
            lat = request.location.lat,
            lng = request.location.lng,
            radius_m = request.radius_m,
            "fixture nearby search"
        );
        match &self.nearby {
            Some(json) => parse_nearby_search(json),
            None => Err(PlacesError::ZeroResults),
        }
    }

    fn place_details(&self, place_id: &str, photo_max_width: u32) -> PlacesResult<PlaceDetails> {
        let json = self.details.get(place_id).ok_or_else(|| PlacesError::Status {
            status: "NOT_FOUND".into(),
            message: format!("no fixture for {}", place_id),
        })?;
        parse_place_details(json, |reference| {
            photo_url(DEFAULT_BASE_URL, reference, photo_max_width, "fixture")
        })
    }
}
