use airprox_core::models::Coordinate;
use geo::{Distance, HaversineMeasure};

use crate::convert::to_geo_point;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates in meters (haversine).
///
/// Symmetric bit-for-bit; non-finite inputs propagate to a non-finite result.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    HaversineMeasure::new(EARTH_RADIUS_METERS).distance(to_geo_point(a), to_geo_point(b))
}
