//! Notification and analytics content for a fired match

use airprox_core::models::Match;
use airprox_core::ports::{AnalyticsEvent, Notification, PROXIMITY_EVENT};

pub const NOTIFICATION_TITLE: &str = "Airport nearby";

pub fn build_notification(candidate: &Match<'_>) -> Notification {
    let name = candidate.point.display_name();
    let payload = serde_json::json!({
        "kind": "proximity",
        "airport_name": name,
        "iata": candidate.point.iata,
        "distance_meters": candidate.distance_meters,
    });

    Notification {
        title: NOTIFICATION_TITLE.to_string(),
        body: format!("You are {:.2} meters from {}", candidate.distance_meters, name),
        payload: payload.to_string(),
    }
}

pub fn build_event(candidate: &Match<'_>) -> AnalyticsEvent {
    AnalyticsEvent {
        name: PROXIMITY_EVENT.to_string(),
        airport_name: candidate.point.display_name().to_string(),
        distance_meters: candidate.distance_meters,
    }
}
