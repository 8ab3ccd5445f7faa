use airprox_core::error::Result;
use airprox_core::models::{PointOfInterestSet, SuppressionState};

/// Port for the persisted point-of-interest snapshot
pub trait PointSetStore: Send + Sync {
    /// Persist the full ordered set, replacing any previous one
    fn save_points(&self, set: &PointOfInterestSet) -> Result<()>;

    /// Load the persisted set; `None` when no dataset was ever saved
    fn load_points(&self) -> Result<Option<PointOfInterestSet>>;
}

/// An exclusive read-modify-write session over the suppression state.
///
/// While a transaction is open no other transaction on the same store (in
/// this or any other process) can begin. Dropping it without calling
/// [`commit`](Self::commit) discards every change.
pub trait SuppressionTransaction {
    fn state(&self) -> &SuppressionState;

    fn state_mut(&mut self) -> &mut SuppressionState;

    /// Make the changes durable and release exclusivity
    fn commit(self: Box<Self>) -> Result<()>;
}

/// Port for the persisted suppression state
pub trait SuppressionStore: Send + Sync {
    /// Begin an exclusive transaction, blocking the calling thread until no
    /// other one is open. Async callers run it on a blocking pool.
    fn begin(&self) -> Result<Box<dyn SuppressionTransaction + '_>>;

    /// Consistent copy of the current state
    fn snapshot(&self) -> Result<SuppressionState> {
        let tx = self.begin()?;
        Ok(tx.state().clone())
    }
}
