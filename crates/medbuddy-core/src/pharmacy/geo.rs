//! Great-circle distance and map helpers.

use crate::models::LatLng;

/// Mean Earth radius used for distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Map center when the user's location is unknown (Mumbai).
pub const DEFAULT_CENTER: LatLng = LatLng::new(19.076, 72.8777);

/// Haversine distance between two points in kilometres.
pub fn haversine_km(from: LatLng, to: LatLng) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round a distance to two decimals for display and sorting.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Driving directions link for a destination.
pub fn directions_url(destination: LatLng) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        destination.lat, destination.lng
    )
}
