//! Blocking HTTP client for the places web service.

use std::time::Duration;

use medbuddy_core::config::AppConfig;
use medbuddy_core::pharmacy::{
    NearbySearchRequest, PlaceDetails, PlaceSummary, PlacesError, PlacesResult, PlacesService,
};

use crate::request::{details_params, nearby_search_params, photo_url, DEFAULT_BASE_URL};
use crate::response::{parse_nearby_search, parse_place_details};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Places service over HTTPS.
pub struct HttpPlaces {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl HttpPlaces {
    pub fn new(api_key: &str) -> PlacesResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Client using the configured API key. Fails when no key is set.
    pub fn from_config(config: &AppConfig) -> PlacesResult<Self> {
        let api_key = config
            .maps_api_key
            .as_deref()
            .ok_or(PlacesError::MissingApiKey)?;
        Self::new(api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str, timeout: Duration) -> PlacesResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlacesError::Transport(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn get(&self, path: &str, params: &[(&'static str, String)]) -> PlacesResult<String> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .map_err(|e| PlacesError::Transport(format!("request to {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PlacesError::Transport(format!(
                "{} returned HTTP {}: {}",
                path,
                status.as_u16(),
                body
            )));
        }

        response
            .text()
            .map_err(|e| PlacesError::Transport(format!("failed to read body: {}", e)))
    }
}

impl PlacesService for HttpPlaces {
    fn nearby_search(&self, request: &NearbySearchRequest) -> PlacesResult<Vec<PlaceSummary>> {
        let body = self.get(
            "nearbysearch/json",
            &nearby_search_params(request, &self.api_key),
        )?;
        let places = parse_nearby_search(&body)?;
        tracing::info!(count = places.len(), "nearby search complete");
        Ok(places)
    }

    fn place_details(&self, place_id: &str, photo_max_width: u32) -> PlacesResult<PlaceDetails> {
        let body = self.get("details/json", &details_params(place_id, &self.api_key))?;
        parse_place_details(&body, |reference| {
            photo_url(&self.base_url, reference, photo_max_width, &self.api_key)
        })
    }
}
