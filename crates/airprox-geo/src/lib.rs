//! airprox Geo - Great-circle distance and proximity matching
//!
//! This crate holds the pure geodesy used by the engine and the
//! first-within-radius candidate selection.

pub mod convert;
pub mod distance;
pub mod matcher;

pub use distance::{distance_meters, EARTH_RADIUS_METERS};
pub use matcher::{ProximityMatcher, DEFAULT_RADIUS_METERS};
