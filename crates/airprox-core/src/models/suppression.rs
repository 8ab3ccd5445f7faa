use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::geometry::Coordinate;
use crate::error::{ProximityError, Result};

/// Storage key under which suppression state is persisted
pub const SUPPRESSION_KEY: &str = "suppression";

/// How a fired point is re-armed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GatePolicy {
    /// Fire once per point and never again until manually reset
    #[default]
    Latch,

    /// Re-arm a point once a fix is observed outside its trigger radius
    RearmOnExit,
}

/// Record of one fired notification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuppressionEntry {
    /// Where the fired point is, so re-arming does not need the point set
    pub coordinate: Coordinate,
    pub fired_at: DateTime<Utc>,
}

/// Points that already fired in the current approach episode, keyed by
/// point identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuppressionState {
    entries: BTreeMap<String, SuppressionEntry>,
}

impl SuppressionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_suppressed(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&SuppressionEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: SuppressionEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Remove one entry, returning whether it existed
    pub fn clear(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Remove every entry for which `predicate` holds, returning the removed keys
    pub fn clear_where<F>(&mut self, mut predicate: F) -> Vec<String>
    where
        F: FnMut(&str, &SuppressionEntry) -> bool,
    {
        let removed: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| predicate(key, entry))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &removed {
            self.entries.remove(key);
        }
        removed
    }

    pub fn clear_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SuppressionEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| ProximityError::storage(SUPPRESSION_KEY, e))
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| ProximityError::storage(SUPPRESSION_KEY, e))
    }
}
