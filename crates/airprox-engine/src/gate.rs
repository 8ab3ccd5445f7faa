//! One-shot notification policy.
//!
//! The gate answers "should this match notify now?" against the persisted
//! suppression state and records fired points. How a fired point is re-armed
//! is isolated here behind [`GatePolicy`].

use airprox_core::models::{Fix, GatePolicy, Match, SuppressionEntry, SuppressionState};
use airprox_geo::ProximityMatcher;
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotificationGate {
    policy: GatePolicy,
    matcher: ProximityMatcher,
}

impl NotificationGate {
    /// `matcher` supplies the radius used to decide that a fix left a point
    pub fn new(policy: GatePolicy, matcher: ProximityMatcher) -> Self {
        Self { policy, matcher }
    }

    /// Whether fixes without a match can still change suppression state
    pub fn rearms(&self) -> bool {
        match self.policy {
            GatePolicy::Latch => false,
            GatePolicy::RearmOnExit => true,
        }
    }

    /// True iff no notification has been recorded for the matched point
    pub fn should_fire(&self, candidate: &Match<'_>, state: &SuppressionState) -> bool {
        !state.is_suppressed(&candidate.identity_key())
    }

    /// Latch the matched point
    pub fn record_fired(&self, candidate: &Match<'_>, state: &mut SuppressionState) {
        state.insert(
            candidate.identity_key(),
            SuppressionEntry { coordinate: candidate.point.coordinate, fired_at: Utc::now() },
        );
    }

    /// Apply the re-arm policy for a new fix, returning the re-armed keys
    pub fn observe(&self, fix: &Fix, state: &mut SuppressionState) -> Vec<String> {
        match self.policy {
            GatePolicy::Latch => Vec::new(),
            GatePolicy::RearmOnExit => {
                let position = fix.coordinate;
                // A malformed fix says nothing about where the device is
                if !position.latitude.is_finite() || !position.longitude.is_finite() {
                    return Vec::new();
                }
                state.clear_where(|_, entry| !self.matcher.is_within(position, entry.coordinate))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airprox_core::models::{Coordinate, PointOfInterest, PointOfInterestSet};

    fn jfk_set() -> PointOfInterestSet {
        PointOfInterestSet::new(vec![PointOfInterest::new(
            Some("JFK".to_string()),
            Coordinate::new(40.6413, -73.7781),
        )])
    }

    #[test]
    fn test_latch_fires_exactly_once() {
        let set = jfk_set();
        let fix = Fix::new(40.6413, -73.7781);
        let candidate = ProximityMatcher::default().find_match(&fix, &set).unwrap();
        let gate = NotificationGate::new(GatePolicy::Latch, ProximityMatcher::default());
        let mut state = SuppressionState::new();

        assert!(gate.should_fire(&candidate, &state));
        // Checking alone does not latch
        assert!(gate.should_fire(&candidate, &state));

        gate.record_fired(&candidate, &mut state);

        for _ in 0..3 {
            assert!(!gate.should_fire(&candidate, &state));
        }
        assert_eq!(state.get("JFK").unwrap().coordinate, Coordinate::new(40.6413, -73.7781));
    }

    #[test]
    fn test_latch_never_rearms() {
        let set = jfk_set();
        let gate = NotificationGate::new(GatePolicy::Latch, ProximityMatcher::default());
        let mut state = SuppressionState::new();
        let candidate = ProximityMatcher::default().find_match(&Fix::new(40.6413, -73.7781), &set).unwrap();
        gate.record_fired(&candidate, &mut state);

        let rearmed = gate.observe(&Fix::new(0.0, 0.0), &mut state);

        assert!(rearmed.is_empty());
        assert!(!gate.rearms());
        assert!(!gate.should_fire(&candidate, &state));
    }

    #[test]
    fn test_rearm_on_exit() {
        let set = jfk_set();
        let matcher = ProximityMatcher::default();
        let gate = NotificationGate::new(GatePolicy::RearmOnExit, matcher);
        let mut state = SuppressionState::new();
        let inside = Fix::new(40.6413, -73.7781);
        let candidate = matcher.find_match(&inside, &set).unwrap();
        gate.record_fired(&candidate, &mut state);

        // Still inside: stays latched
        assert!(gate.observe(&inside, &mut state).is_empty());
        assert!(!gate.should_fire(&candidate, &state));

        // Malformed fix: no change
        assert!(gate.observe(&Fix::new(f64::NAN, 0.0), &mut state).is_empty());

        // Left the radius: re-armed
        let rearmed = gate.observe(&Fix::new(40.7, -73.9), &mut state);
        assert_eq!(rearmed, vec!["JFK".to_string()]);
        assert!(gate.should_fire(&candidate, &state));
    }
}
