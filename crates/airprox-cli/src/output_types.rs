//! Serializable command results for `--json` output

use airprox_engine::{FixOutcome, IngestSummary};
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Serialize)]
pub struct FetchOutput {
    pub source: String,
    pub loaded: usize,
    pub dropped: Vec<DroppedOutput>,
    pub state_dir: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct DroppedOutput {
    #[tabled(rename = "Record")]
    pub index: usize,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Reason")]
    pub reason: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FixOutput {
    NoPointSet,
    NoMatch,
    Suppressed { point: String, distance_meters: f64 },
    Fired { point: String, distance_meters: f64, sink_failures: usize },
}

impl From<FixOutcome> for FixOutput {
    fn from(outcome: FixOutcome) -> Self {
        match outcome {
            FixOutcome::NoPointSet => FixOutput::NoPointSet,
            FixOutcome::NoMatch => FixOutput::NoMatch,
            FixOutcome::Suppressed { point, distance_meters } => {
                FixOutput::Suppressed { point, distance_meters }
            }
            FixOutcome::Fired { point, distance_meters, sink_failures } => {
                FixOutput::Fired { point, distance_meters, sink_failures }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WatchOutput {
    pub processed: usize,
    pub fired: usize,
    pub suppressed: usize,
    pub no_match: usize,
    pub failed: usize,
    pub skipped_lines: usize,
}

impl WatchOutput {
    pub fn new(summary: IngestSummary, skipped_lines: usize) -> Self {
        Self {
            processed: summary.processed,
            fired: summary.fired,
            suppressed: summary.suppressed,
            no_match: summary.no_match,
            failed: summary.failed,
            skipped_lines,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub state_dir: String,
    pub point_count: Option<usize>,
    pub suppressed: Vec<SuppressedRow>,
    pub config: Vec<ConfigRow>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct SuppressedRow {
    #[tabled(rename = "Airport")]
    pub key: String,
    #[tabled(rename = "Fired at")]
    pub fired_at: String,
    #[tabled(rename = "Latitude")]
    pub latitude: f64,
    #[tabled(rename = "Longitude")]
    pub longitude: f64,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct ResetOutput {
    pub cleared: usize,
}
