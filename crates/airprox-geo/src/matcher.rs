use airprox_core::models::{Coordinate, Fix, Match, PointOfInterestSet};

use crate::distance::distance_meters;

pub use airprox_core::config::DEFAULT_RADIUS_METERS;

/// Selects the point a fix is "near".
///
/// The set is scanned in insertion order and the first point within the
/// trigger radius wins, even when a later point is strictly closer. This
/// bounds the work per fix and makes set order part of the observable
/// behavior, so it must not be replaced by a nearest-of-all search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityMatcher {
    radius_meters: f64,
}

impl Default for ProximityMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS_METERS)
    }
}

impl ProximityMatcher {
    pub fn new(radius_meters: f64) -> Self {
        Self { radius_meters }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// Whether `point` lies within the trigger radius of `position`
    pub fn is_within(&self, position: Coordinate, point: Coordinate) -> bool {
        distance_meters(position, point) <= self.radius_meters
    }

    /// First point of `set`, in stored order, within the radius of `fix`
    pub fn find_match<'a>(&self, fix: &Fix, set: &'a PointOfInterestSet) -> Option<Match<'a>> {
        find_match(fix, set, self.radius_meters)
    }
}

/// First point of `set`, in stored order, whose distance to `fix` is at most
/// `radius_meters`
pub fn find_match<'a>(
    fix: &Fix,
    set: &'a PointOfInterestSet,
    radius_meters: f64,
) -> Option<Match<'a>> {
    set.iter().enumerate().find_map(|(index, point)| {
        let distance = distance_meters(fix.coordinate, point.coordinate);
        // NaN distances compare false and never match
        (distance <= radius_meters).then_some(Match { point, index, distance_meters: distance })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use airprox_core::models::PointOfInterest;

    fn point(name: &str, lat: f64, lon: f64) -> PointOfInterest {
        PointOfInterest::new(Some(name.to_string()), Coordinate::new(lat, lon))
    }

    #[test]
    fn test_match_inside_default_radius() {
        let set = PointOfInterestSet::new(vec![point("Null Island", 0.0, 0.0)]);
        let matcher = ProximityMatcher::default();

        // ~48.9 m east
        let m = matcher.find_match(&Fix::new(0.0, 0.00044), &set).unwrap();
        assert_eq!(m.point.name.as_deref(), Some("Null Island"));
        assert_eq!(m.index, 0);
        assert!(m.distance_meters < 50.0);

        // ~55.6 m east
        assert!(matcher.find_match(&Fix::new(0.0, 0.0005), &set).is_none());
    }

    #[test]
    fn test_radius_is_inclusive() {
        let set = PointOfInterestSet::new(vec![point("Edge", 0.0, 0.0)]);
        let fix = Fix::new(0.0, 0.00045);
        let exact = distance_meters(fix.coordinate, Coordinate::new(0.0, 0.0));

        assert!(find_match(&fix, &set, exact).is_some());
        assert!(find_match(&fix, &set, exact - 1e-9).is_none());
    }

    #[test]
    fn test_first_in_order_wins_over_closer() {
        // Both within 50 m of the fix; the later one is closer
        let set = PointOfInterestSet::new(vec![
            point("Earlier", 0.0, 0.0003),
            point("Later", 0.0, 0.0001),
        ]);
        let fix = Fix::new(0.0, 0.0);

        let m = ProximityMatcher::default().find_match(&fix, &set).unwrap();

        assert_eq!(m.point.name.as_deref(), Some("Earlier"));
        assert_eq!(m.index, 0);
        assert!(m.distance_meters > distance_meters(fix.coordinate, Coordinate::new(0.0, 0.0001)));
    }

    #[test]
    fn test_skips_points_outside_radius() {
        let set = PointOfInterestSet::new(vec![
            point("Far", 10.0, 10.0),
            point("Near", 0.0, 0.0001),
        ]);

        let m = ProximityMatcher::default().find_match(&Fix::new(0.0, 0.0), &set).unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.identity_key(), "Near");
    }

    #[test]
    fn test_empty_set_has_no_match() {
        let set = PointOfInterestSet::default();
        assert!(ProximityMatcher::default().find_match(&Fix::new(0.0, 0.0), &set).is_none());
    }

    #[test]
    fn test_nan_fix_never_matches() {
        let set = PointOfInterestSet::new(vec![point("Origin", 0.0, 0.0)]);
        assert!(ProximityMatcher::new(1e9).find_match(&Fix::new(f64::NAN, 0.0), &set).is_none());
    }

    #[test]
    fn test_is_within() {
        let matcher = ProximityMatcher::new(100.0);
        assert!(matcher.is_within(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.0008)));
        assert!(!matcher.is_within(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.001)));
    }
}
