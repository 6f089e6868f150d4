//! Query parameters for the places web service.

use medbuddy_core::pharmacy::NearbySearchRequest;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Fields requested from the details endpoint.
pub const DETAIL_FIELDS: [&str; 4] = ["formatted_phone_number", "opening_hours", "photos", "website"];

/// Parameters for `/nearbysearch/json`.
pub fn nearby_search_params(request: &NearbySearchRequest, api_key: &str) -> Vec<(&'static str, String)> {
    vec![
        (
            "location",
            format!("{},{}", request.location.lat, request.location.lng),
        ),
        ("radius", request.radius_m.to_string()),
        ("type", request.place_type.clone()),
        ("keyword", request.keyword.clone()),
        ("key", api_key.to_string()),
    ]
}

/// Parameters for `/details/json`.
pub fn details_params(place_id: &str, api_key: &str) -> Vec<(&'static str, String)> {
    vec![
        ("place_id", place_id.to_string()),
        ("fields", DETAIL_FIELDS.join(",")),
        ("key", api_key.to_string()),
    ]
}

/// URL of a place photo scaled to `max_width`.
pub fn photo_url(base_url: &str, photo_reference: &str, max_width: u32, api_key: &str) -> String {
    format!(
        "{}/photo?maxwidth={}&photo_reference={}&key={}",
        base_url.trim_end_matches('/'),
        max_width,
        photo_reference,
        api_key
    )
}
