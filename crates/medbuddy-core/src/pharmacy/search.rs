//! Pharmacy finder: search, order, enrich.

use super::{
    haversine_km, round_km, Locator, NearbySearchRequest, PharmacyError, PharmacyResult,
    PlaceSummary, PlacesError, PlacesService, PositionOptions, GeolocationError, PHOTO_MAX_WIDTH,
    SEARCH_RADIUS_M,
};
use crate::config::AppConfig;
use crate::models::{LatLng, Pharmacy};

const UNKNOWN_NAME: &str = "Unknown Pharmacy";
const UNKNOWN_ADDRESS: &str = "Address not available";

/// Finds pharmacies around a location through a places service.
///
/// A finder without a service behaves like a map that hasn't loaded yet:
/// every search fails with [`PharmacyError::NotReady`].
pub struct PharmacyFinder<'a> {
    service: Option<&'a dyn PlacesService>,
    radius_m: u32,
}

impl<'a> PharmacyFinder<'a> {
    pub fn new(service: &'a dyn PlacesService) -> Self {
        Self {
            service: Some(service),
            radius_m: SEARCH_RADIUS_M,
        }
    }

    /// Finder searching the configured radius.
    pub fn from_config(service: &'a dyn PlacesService, config: &AppConfig) -> Self {
        Self::new(service).with_radius(config.search_radius_m)
    }

    /// Finder whose places service is not available yet.
    pub fn not_ready() -> Self {
        Self {
            service: None,
            radius_m: SEARCH_RADIUS_M,
        }
    }

    pub fn with_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Search around `location`, nearest first.
    pub fn search(&self, location: Option<LatLng>) -> PharmacyResult<Vec<Pharmacy>> {
        let service = self.service.ok_or(PharmacyError::NotReady)?;
        let origin = location.ok_or(PharmacyError::NoLocation)?;

        let request = NearbySearchRequest::pharmacies(origin, self.radius_m);
        let places = service.nearby_search(&request).map_err(|e| match e {
            PlacesError::ZeroResults => PharmacyError::NoResults,
            other => {
                tracing::warn!(error = %other, "nearby pharmacy search failed");
                PharmacyError::SearchFailed
            }
        })?;

        let mut pharmacies: Vec<Pharmacy> = places
            .into_iter()
            .map(|place| to_pharmacy(place, origin))
            .collect();
        sort_by_distance(&mut pharmacies);

        tracing::info!(count = pharmacies.len(), "pharmacy search complete");
        Ok(pharmacies)
    }

    /// Ask the locator for a position, then search around it.
    pub fn locate_and_search(
        &self,
        locator: Option<&dyn Locator>,
        options: &PositionOptions,
    ) -> PharmacyResult<(LatLng, Vec<Pharmacy>)> {
        let locator = locator.ok_or(GeolocationError::Unsupported)?;
        let position = locator.current_position(options)?;
        let pharmacies = self.search(Some(position))?;
        Ok((position, pharmacies))
    }

    /// Copy of `pharmacy` with phone, hours, photos and website filled in.
    ///
    /// Any lookup failure returns the record unchanged.
    pub fn with_details(&self, pharmacy: &Pharmacy) -> Pharmacy {
        let mut enriched = pharmacy.clone();
        let Some(service) = self.service else {
            return enriched;
        };

        match service.place_details(&pharmacy.id, PHOTO_MAX_WIDTH) {
            Ok(details) => {
                enriched.phone_number = details.phone_number;
                enriched.opening_hours = details.weekday_text;
                enriched.photos = details.photo_urls;
                enriched.website = details.website;
            }
            Err(e) => {
                tracing::debug!(place_id = %pharmacy.id, error = %e, "place details lookup failed");
            }
        }
        enriched
    }
}

/// Convert a search hit, filling in defaults for missing fields.
pub fn to_pharmacy(place: PlaceSummary, origin: LatLng) -> Pharmacy {
    let location = place.location.unwrap_or(LatLng::new(0.0, 0.0));

    Pharmacy {
        id: place
            .place_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        name: place.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        address: place.vicinity.unwrap_or_else(|| UNKNOWN_ADDRESS.to_string()),
        location,
        distance_km: round_km(haversine_km(origin, location)),
        rating: place.rating,
        open_now: place.open_now,
        price_level: place.price_level,
        phone_number: None,
        opening_hours: None,
        photos: None,
        website: None,
    }
}

/// Sort ascending by distance. NaN distances sort last.
pub fn sort_by_distance(pharmacies: &mut [Pharmacy]) {
    pharmacies.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
}

/// The first `limit` entries of an already sorted list.
pub fn nearest(pharmacies: &[Pharmacy], limit: usize) -> &[Pharmacy] {
    &pharmacies[..pharmacies.len().min(limit)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pharmacy::{PlaceDetails, PlacesResult, DISPLAY_LIMIT};
    use std::cell::RefCell;

    struct StubPlaces {
        results: PlacesResult<Vec<PlaceSummary>>,
        details: PlacesResult<PlaceDetails>,
        last_request: RefCell<Option<NearbySearchRequest>>,
    }

    impl StubPlaces {
        fn returning(results: PlacesResult<Vec<PlaceSummary>>) -> Self {
            Self {
                results,
                details: Err(PlacesError::Transport("offline".into())),
                last_request: RefCell::new(None),
            }
        }
    }

    impl PlacesService for StubPlaces {
        fn nearby_search(&self, request: &NearbySearchRequest) -> PlacesResult<Vec<PlaceSummary>> {
            *self.last_request.borrow_mut() = Some(request.clone());
            self.results.clone()
        }

        fn place_details(&self, _place_id: &str, _photo_max_width: u32) -> PlacesResult<PlaceDetails> {
            self.details.clone()
        }
    }

    struct FixedLocator(Result<LatLng, GeolocationError>);

    impl Locator for FixedLocator {
        fn current_position(&self, _options: &PositionOptions) -> Result<LatLng, GeolocationError> {
            self.0
        }
    }

    fn origin() -> LatLng {
        LatLng::new(0.0, 0.0)
    }

    // 1 degree of latitude is ~111.19 km; these sit at the requested distances.
    fn place_at_km(id: &str, km: f64) -> PlaceSummary {
        PlaceSummary {
            place_id: Some(id.into()),
            name: Some(format!("Pharmacy {}", id)),
            vicinity: Some("Main Road".into()),
            location: Some(LatLng::new(km / 111.194_926_6, 0.0)),
            rating: Some(4.2),
            open_now: Some(true),
            price_level: None,
        }
    }

    fn pharmacy_at(id: &str, km: f64) -> Pharmacy {
        to_pharmacy(place_at_km(id, km), origin())
    }

    #[test]
    fn test_search_sorts_by_distance() {
        let stub = StubPlaces::returning(Ok(vec![
            place_at_km("a", 3.2),
            place_at_km("b", 0.5),
            place_at_km("c", 7.1),
        ]));
        let finder = PharmacyFinder::new(&stub);

        let found = finder.search(Some(origin())).unwrap();
        let distances: Vec<f64> = found.iter().map(|p| p.distance_km).collect();
        assert_eq!(distances, vec![0.5, 3.2, 7.1]);

        let request = stub.last_request.borrow().clone().unwrap();
        assert_eq!(request.radius_m, 5000);
        assert_eq!(request.keyword, "pharmacy medical store chemist");
    }

    #[test]
    fn test_configured_radius() {
        let stub = StubPlaces::returning(Ok(vec![place_at_km("a", 1.0)]));
        let config = AppConfig {
            search_radius_m: 1500,
            ..AppConfig::default()
        };

        PharmacyFinder::from_config(&stub, &config)
            .search(Some(origin()))
            .unwrap();
        let request = stub.last_request.borrow().clone().unwrap();
        assert_eq!(request.radius_m, 1500);
    }

    #[test]
    fn test_missing_fields_defaulted() {
        let pharmacy = to_pharmacy(PlaceSummary::default(), LatLng::new(0.0, 0.0));
        assert_eq!(pharmacy.name, "Unknown Pharmacy");
        assert_eq!(pharmacy.address, "Address not available");
        assert_eq!(pharmacy.location, LatLng::new(0.0, 0.0));
        assert_eq!(pharmacy.distance_km, 0.0);
        assert_eq!(pharmacy.id.len(), 36);
    }

    #[test]
    fn test_not_ready_and_no_location() {
        assert_eq!(
            PharmacyFinder::not_ready().search(Some(origin())),
            Err(PharmacyError::NotReady)
        );

        let stub = StubPlaces::returning(Ok(vec![]));
        assert_eq!(
            PharmacyFinder::new(&stub).search(None),
            Err(PharmacyError::NoLocation)
        );
    }

    #[test]
    fn test_service_errors_mapped() {
        let zero = StubPlaces::returning(Err(PlacesError::ZeroResults));
        assert_eq!(
            PharmacyFinder::new(&zero).search(Some(origin())),
            Err(PharmacyError::NoResults)
        );

        let denied = StubPlaces::returning(Err(PlacesError::Status {
            status: "REQUEST_DENIED".into(),
            message: "bad key".into(),
        }));
        assert_eq!(
            PharmacyFinder::new(&denied).search(Some(origin())),
            Err(PharmacyError::SearchFailed)
        );
    }

    #[test]
    fn test_locate_then_search() {
        let stub = StubPlaces::returning(Ok(vec![place_at_km("a", 1.0)]));
        let finder = PharmacyFinder::new(&stub);
        let opts = PositionOptions::default();

        let locator = FixedLocator(Ok(origin()));
        let (position, found) = finder.locate_and_search(Some(&locator), &opts).unwrap();
        assert_eq!(position, origin());
        assert_eq!(found.len(), 1);

        let denied = FixedLocator(Err(GeolocationError::from_code(1)));
        assert_eq!(
            finder.locate_and_search(Some(&denied), &opts).unwrap_err().to_string(),
            "Please enable location access in your browser settings"
        );

        assert_eq!(
            finder.locate_and_search(None, &opts),
            Err(PharmacyError::Geolocation(GeolocationError::Unsupported))
        );
    }

    #[test]
    fn test_details_enrichment() {
        let mut stub = StubPlaces::returning(Ok(vec![]));
        stub.details = Ok(PlaceDetails {
            phone_number: Some("022 1234 5678".into()),
            weekday_text: Some(vec!["Monday: 9:00 AM – 9:00 PM".into()]),
            photo_urls: Some(vec!["https://example.com/p.jpg".into()]),
            website: Some("https://example.com".into()),
        });
        let finder = PharmacyFinder::new(&stub);

        let base = pharmacy_at("a", 1.0);
        assert!(!base.has_details());
        let enriched = finder.with_details(&base);
        assert!(enriched.has_details());
        assert_eq!(enriched.phone_number.as_deref(), Some("022 1234 5678"));
        assert_eq!(enriched.distance_km, base.distance_km);
    }

    #[test]
    fn test_details_failure_leaves_record() {
        let stub = StubPlaces::returning(Ok(vec![]));
        let finder = PharmacyFinder::new(&stub);

        let base = pharmacy_at("a", 1.0);
        assert_eq!(finder.with_details(&base), base);
        assert_eq!(PharmacyFinder::not_ready().with_details(&base), base);
    }

    #[test]
    fn test_nan_distance_sorts_last() {
        let mut list = vec![
            pharmacy_at("far", 4.0),
            pharmacy_at("near", 1.0),
            pharmacy_at("mid", 2.0),
        ];
        list[1].distance_km = f64::NAN;
        list.push(pharmacy_at("nearest", 0.5));
        sort_by_distance(&mut list);

        let ids: Vec<&str> = list.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["nearest", "mid", "far", "near"]);
    }

    #[test]
    fn test_nearest() {
        let list: Vec<Pharmacy> = (0..8).map(|i| pharmacy_at(&i.to_string(), i as f64)).collect();
        assert_eq!(nearest(&list, DISPLAY_LIMIT).len(), 5);
        assert_eq!(nearest(&list[..3], DISPLAY_LIMIT).len(), 3);
    }
}
