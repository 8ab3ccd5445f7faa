//! In-memory storage implementation for foreground use and testing.
//!
//! The point set is kept in its serialized form so that reloading it goes
//! through the same round trip as the file-backed store.

use airprox_core::error::{ProximityError, Result};
use airprox_core::models::{PointOfInterestSet, SuppressionState, POINTS_KEY, SUPPRESSION_KEY};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use crate::ports::{PointSetStore, SuppressionStore, SuppressionTransaction};

/// Process-local state store
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    points: Arc<RwLock<Option<Vec<u8>>>>,
    suppression: Arc<Mutex<SuppressionState>>,
}

impl MemoryStateStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl PointSetStore for MemoryStateStore {
    fn save_points(&self, set: &PointOfInterestSet) -> Result<()> {
        let bytes = set.serialize()?;
        let mut points = self.points.write().map_err(|_| poisoned(POINTS_KEY))?;
        *points = Some(bytes);
        Ok(())
    }

    fn load_points(&self) -> Result<Option<PointOfInterestSet>> {
        let points = self.points.read().map_err(|_| poisoned(POINTS_KEY))?;
        points.as_deref().map(PointOfInterestSet::deserialize).transpose()
    }
}

/// Transaction holding the store mutex until commit or drop
struct MemorySuppressionTransaction<'a> {
    guard: MutexGuard<'a, SuppressionState>,
    working: SuppressionState,
}

impl SuppressionTransaction for MemorySuppressionTransaction<'_> {
    fn state(&self) -> &SuppressionState {
        &self.working
    }

    fn state_mut(&mut self) -> &mut SuppressionState {
        &mut self.working
    }

    fn commit(self: Box<Self>) -> Result<()> {
        let MemorySuppressionTransaction { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

impl SuppressionStore for MemoryStateStore {
    fn begin(&self) -> Result<Box<dyn SuppressionTransaction + '_>> {
        let guard = self.suppression.lock().map_err(|_| poisoned(SUPPRESSION_KEY))?;
        let working = guard.clone();
        Ok(Box::new(MemorySuppressionTransaction { guard, working }))
    }
}

fn poisoned(key: &str) -> ProximityError {
    ProximityError::storage(key, "lock poisoned by a panicked writer")
}
