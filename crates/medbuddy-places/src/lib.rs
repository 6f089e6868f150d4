//! Places web-service adapter for the MedBuddy pharmacy finder.
//!
//! Implements [`medbuddy_core::pharmacy::PlacesService`] on top of the
//! nearby-search and place-details JSON endpoints. The live client sits
//! behind the `http` feature; [`FixturePlaces`] serves stored bodies.

pub mod fixture;
pub mod request;
pub mod response;

#[cfg(feature = "http")]
pub mod client;

pub use fixture::*;
pub use request::*;
pub use response::*;

#[cfg(feature = "http")]
pub use client::*;
