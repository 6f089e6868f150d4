//! Pharmacy finder driven by stored places responses.

use anyhow::Result;
use proptest::prelude::*;

use medbuddy_core::models::LatLng;
use medbuddy_core::pharmacy::{
    nearest, PharmacyError, PharmacyFinder, DEFAULT_CENTER, DISPLAY_LIMIT,
};
use medbuddy_places::{parse_nearby_search, FixturePlaces};

const NEARBY: &str = r#"{
    "status": "OK",
    "results": [
        {
            "place_id": "far",
            "name": "Wellness Forever",
            "vicinity": "Powai",
            "geometry": {"location": {"lat": 19.1176, "lng": 72.9060}},
            "rating": 4.0
        },
        {
            "place_id": "near",
            "name": "Apollo Pharmacy",
            "vicinity": "Fort",
            "geometry": {"location": {"lat": 19.0761, "lng": 72.8778}},
            "opening_hours": {"open_now": true}
        },
        {
            "place_id": "mid",
            "geometry": {"location": {"lat": 19.0600, "lng": 72.8500}}
        }
    ]
}"#;

const DETAILS: &str = r#"{
    "status": "OK",
    "result": {
        "name": "Apollo Pharmacy",
        "formatted_phone_number": "022 2266 0000",
        "opening_hours": {"weekday_text": ["Monday: Open 24 hours"]},
        "photos": [{"photo_reference": "abc"}],
        "website": "https://apollo.example.com"
    }
}"#;

#[test]
fn search_orders_by_distance() -> Result<()> {
    let places = FixturePlaces::new().with_nearby(NEARBY);
    let finder = PharmacyFinder::new(&places);

    let pharmacies = finder.search(Some(DEFAULT_CENTER))?;

    let ids: Vec<&str> = pharmacies.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["near", "mid", "far"]);
    assert!(pharmacies[0].distance_km < 0.1);
    assert_eq!(pharmacies[0].open_now, Some(true));
    assert_eq!(pharmacies[1].name, "Unknown Pharmacy");
    assert_eq!(pharmacies[1].address, "Address not available");
    Ok(())
}

#[test]
fn search_failures_map_to_banners() {
    let zero = FixturePlaces::new().with_nearby(r#"{"status": "ZERO_RESULTS"}"#);
    assert_eq!(
        PharmacyFinder::new(&zero).search(Some(DEFAULT_CENTER)),
        Err(PharmacyError::NoResults)
    );

    let denied = FixturePlaces::new()
        .with_nearby(r#"{"status": "REQUEST_DENIED", "error_message": "API key invalid"}"#);
    let err = PharmacyFinder::new(&denied)
        .search(Some(DEFAULT_CENTER))
        .unwrap_err();
    assert_eq!(err.to_string(), "No pharmacies found nearby or API error occurred");

    let garbage = FixturePlaces::new().with_nearby("<html>");
    assert_eq!(
        PharmacyFinder::new(&garbage).search(Some(DEFAULT_CENTER)),
        Err(PharmacyError::SearchFailed)
    );
}

#[test]
fn details_enrich_selected_pharmacy() -> Result<()> {
    let places = FixturePlaces::new()
        .with_nearby(NEARBY)
        .with_details("near", DETAILS);
    let finder = PharmacyFinder::new(&places);

    let pharmacies = finder.search(Some(DEFAULT_CENTER))?;
    let enriched = finder.with_details(&pharmacies[0]);

    assert!(enriched.has_details());
    assert_eq!(enriched.phone_number.as_deref(), Some("022 2266 0000"));
    assert_eq!(enriched.website.as_deref(), Some("https://apollo.example.com"));
    assert!(enriched.photos.as_ref().map_or(false, |p| p[0].contains("maxwidth=400")));

    // No details stored for this one: record comes back as it was.
    let unchanged = finder.with_details(&pharmacies[2]);
    assert_eq!(unchanged, pharmacies[2]);
    Ok(())
}

fn nearby_body(points: &[(f64, f64)]) -> String {
    let results: Vec<serde_json::Value> = points
        .iter()
        .enumerate()
        .map(|(i, (lat, lng))| {
            serde_json::json!({
                "place_id": format!("p{}", i),
                "geometry": {"location": {"lat": lat, "lng": lng}}
            })
        })
        .collect();
    serde_json::json!({"status": "OK", "results": results}).to_string()
}

proptest! {
    #[test]
    fn results_are_sorted_and_limited(
        points in prop::collection::vec((18.5f64..19.5, 72.5f64..73.5), 0..20)
    ) {
        let places = FixturePlaces::new().with_nearby(nearby_body(&points));
        let finder = PharmacyFinder::new(&places);

        let pharmacies = finder.search(Some(LatLng::new(19.0, 73.0))).unwrap();
        prop_assert_eq!(pharmacies.len(), points.len());
        prop_assert!(pharmacies.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
        prop_assert!(nearest(&pharmacies, DISPLAY_LIMIT).len() <= DISPLAY_LIMIT);
    }

    #[test]
    fn parsed_summaries_keep_every_result(
        points in prop::collection::vec((-90f64..90.0, -180f64..180.0), 0..10)
    ) {
        let summaries = parse_nearby_search(&nearby_body(&points)).unwrap();
        prop_assert_eq!(summaries.len(), points.len());
        prop_assert!(summaries.iter().all(|s| s.location.is_some()));
    }
}
