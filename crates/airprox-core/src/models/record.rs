use serde::{Deserialize, Serialize};

/// One row of the airport dataset as delivered by the fetch collaborator.
///
/// Coordinates arrive as decimal-degree strings and are parsed when the
/// record is loaded into a [`PointOfInterestSet`](super::PointOfInterestSet).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub iata: Option<String>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
    #[serde(default)]
    pub iso: Option<String>,
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
}

impl RawRecord {
    /// Minimal record with a name and string coordinates
    pub fn new(name: impl Into<String>, lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            lat: Some(lat.into()),
            lon: Some(lon.into()),
            ..Self::default()
        }
    }
}
