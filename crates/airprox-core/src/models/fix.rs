use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geometry::Coordinate;
use super::point::PointOfInterest;

/// One reported device position sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub coordinate: Coordinate,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { coordinate: Coordinate::new(latitude, longitude), timestamp: None }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A point found within the trigger radius of a fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub point: &'a PointOfInterest,

    /// Position of the point in its set
    pub index: usize,

    pub distance_meters: f64,
}

impl Match<'_> {
    pub fn identity_key(&self) -> String {
        self.point.identity_key()
    }
}
