//! Response JSON of the places web service.

use serde::Deserialize;

use medbuddy_core::models::LatLng;
use medbuddy_core::pharmacy::{PlaceDetails, PlaceSummary, PlacesError, PlacesResult};

/// Status field carried by every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacesStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    NotFound,
    UnknownError,
}

impl PlacesStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlacesStatus::Ok => "OK",
            PlacesStatus::ZeroResults => "ZERO_RESULTS",
            PlacesStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            PlacesStatus::RequestDenied => "REQUEST_DENIED",
            PlacesStatus::InvalidRequest => "INVALID_REQUEST",
            PlacesStatus::NotFound => "NOT_FOUND",
            PlacesStatus::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Unrecognised statuses read as `UnknownError`.
    pub fn parse(s: &str) -> Self {
        match s {
            "OK" => PlacesStatus::Ok,
            "ZERO_RESULTS" => PlacesStatus::ZeroResults,
            "OVER_QUERY_LIMIT" => PlacesStatus::OverQueryLimit,
            "REQUEST_DENIED" => PlacesStatus::RequestDenied,
            "INVALID_REQUEST" => PlacesStatus::InvalidRequest,
            "NOT_FOUND" => PlacesStatus::NotFound,
            _ => PlacesStatus::UnknownError,
        }
    }

    /// Turn a non-OK status into an error.
    pub fn check(self, error_message: Option<&str>) -> PlacesResult<()> {
        match self {
            PlacesStatus::Ok => Ok(()),
            PlacesStatus::ZeroResults => Err(PlacesError::ZeroResults),
            other => Err(PlacesError::Status {
                status: other.as_str().to_string(),
                message: error_message.unwrap_or_default().to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceResult {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub vicinity: Option<String>,
    pub geometry: Option<Geometry>,
    pub rating: Option<f64>,
    pub opening_hours: Option<OpeningHours>,
    pub price_level: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: Option<WireLatLng>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireLatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
    pub weekday_text: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    pub result: Option<DetailsResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResult {
    pub formatted_phone_number: Option<String>,
    pub opening_hours: Option<OpeningHours>,
    pub photos: Option<Vec<Photo>>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Photo {
    pub photo_reference: String,
}

impl From<PlaceResult> for PlaceSummary {
    fn from(place: PlaceResult) -> Self {
        Self {
            place_id: place.place_id,
            name: place.name,
            vicinity: place.vicinity,
            location: place
                .geometry
                .and_then(|g| g.location)
                .map(|l| LatLng::new(l.lat, l.lng)),
            rating: place.rating,
            open_now: place.opening_hours.and_then(|h| h.open_now),
            price_level: place.price_level,
        }
    }
}

/// Parse a nearby-search response body.
pub fn parse_nearby_search(json: &str) -> PlacesResult<Vec<PlaceSummary>> {
    let response: NearbySearchResponse =
        serde_json::from_str(json).map_err(|e| PlacesError::Malformed(e.to_string()))?;

    PlacesStatus::parse(&response.status).check(response.error_message.as_deref())?;
    Ok(response.results.into_iter().map(PlaceSummary::from).collect())
}

/// Parse a details response body; `photo_url` turns a photo reference into a URL.
pub fn parse_place_details<F>(json: &str, photo_url: F) -> PlacesResult<PlaceDetails>
where
    F: Fn(&str) -> String,
{
    let response: DetailsResponse =
        serde_json::from_str(json).map_err(|e| PlacesError::Malformed(e.to_string()))?;

    PlacesStatus::parse(&response.status).check(response.error_message.as_deref())?;
    let result = response
        .result
        .ok_or_else(|| PlacesError::Malformed("details response without result".into()))?;

    Ok(PlaceDetails {
        phone_number: result.formatted_phone_number,
        weekday_text: result.opening_hours.and_then(|h| h.weekday_text),
        photo_urls: result
            .photos
            .map(|photos| photos.iter().map(|p| photo_url(&p.photo_reference)).collect()),
        website: result.website,
    })
}
