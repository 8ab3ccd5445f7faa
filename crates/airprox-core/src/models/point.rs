use serde::{Deserialize, Serialize};

use super::geometry::Coordinate;
use super::record::RawRecord;
use crate::error::{ProximityError, Result};

/// Storage key under which the serialized set is persisted
pub const POINTS_KEY: &str = "points";

/// A known airport. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Display label; names are not assumed to be unique
    pub name: Option<String>,

    /// IATA code, when the dataset provides one
    pub iata: Option<String>,

    pub coordinate: Coordinate,
}

impl PointOfInterest {
    pub fn new(name: Option<String>, coordinate: Coordinate) -> Self {
        Self { name, iata: None, coordinate }
    }

    /// Key used for suppression bookkeeping.
    ///
    /// The name is the only identity the dataset offers. Nameless points fall
    /// back to their coordinate so they still latch individually.
    pub fn identity_key(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("@{:.6},{:.6}", self.coordinate.latitude, self.coordinate.longitude),
        }
    }

    /// Human-readable label for notifications
    pub fn display_name(&self) -> &str {
        self.name.as_deref().or(self.iata.as_deref()).unwrap_or("Unknown airport")
    }
}

/// A record rejected during [`PointOfInterestSet::load_with_report`]
#[derive(Debug)]
pub struct DroppedRecord {
    pub index: usize,
    pub name: Option<String>,
    pub error: ProximityError,
}

/// Outcome of loading a raw dataset
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub dropped: Vec<DroppedRecord>,
}

impl LoadReport {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Ordered snapshot of known points.
///
/// Insertion order is significant: it is the tie-break order used by the
/// proximity matcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointOfInterestSet {
    points: Vec<PointOfInterest>,
}

impl PointOfInterestSet {
    pub fn new(points: Vec<PointOfInterest>) -> Self {
        Self { points }
    }

    /// Parse raw records, dropping (and logging) any whose coordinate is unusable
    pub fn load(records: &[RawRecord]) -> Self {
        let (set, report) = Self::load_with_report(records);
        if !report.dropped.is_empty() {
            tracing::warn!(
                "Dropped {} of {} dataset records with unparseable coordinates",
                report.dropped_count(),
                records.len()
            );
        }
        set
    }

    /// Parse raw records and report every dropped one
    pub fn load_with_report(records: &[RawRecord]) -> (Self, LoadReport) {
        let mut points = Vec::with_capacity(records.len());
        let mut report = LoadReport::default();

        for (index, record) in records.iter().enumerate() {
            match parse_coordinate(index, record) {
                Ok(coordinate) => points.push(PointOfInterest {
                    name: record.name.clone(),
                    iata: record.iata.clone(),
                    coordinate,
                }),
                Err(error) => {
                    tracing::debug!("Skipping record {}: {}", index, error);
                    report.dropped.push(DroppedRecord { index, name: record.name.clone(), error });
                }
            }
        }

        report.loaded = points.len();
        (Self { points }, report)
    }

    /// Encode the full ordered sequence for durable storage
    pub fn serialize(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| ProximityError::storage(POINTS_KEY, e))
    }

    /// Decode a sequence previously produced by [`serialize`](Self::serialize)
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ProximityError::storage(POINTS_KEY, e))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PointOfInterest> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointOfInterest> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a PointOfInterestSet {
    type Item = &'a PointOfInterest;
    type IntoIter = std::slice::Iter<'a, PointOfInterest>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn parse_coordinate(index: usize, record: &RawRecord) -> Result<Coordinate> {
    let latitude = parse_degrees(index, "lat", record.lat.as_deref())?;
    let longitude = parse_degrees(index, "lon", record.lon.as_deref())?;
    Ok(Coordinate::new(latitude, longitude))
}

fn parse_degrees(index: usize, field: &str, value: Option<&str>) -> Result<f64> {
    let raw = value.ok_or_else(|| ProximityError::DatasetMalformed {
        record_index: index,
        reason: format!("missing {}", field),
    })?;

    let degrees = raw.trim().parse::<f64>().map_err(|e| ProximityError::DatasetMalformed {
        record_index: index,
        reason: format!("{} '{}' is not a number: {}", field, raw, e),
    })?;

    // "NaN" and "inf" parse successfully but would poison every distance
    if !degrees.is_finite() {
        return Err(ProximityError::DatasetMalformed {
            record_index: index,
            reason: format!("{} '{}' is not finite", field, raw),
        });
    }

    Ok(degrees)
}
