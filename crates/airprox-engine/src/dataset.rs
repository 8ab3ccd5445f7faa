use airprox_core::error::Result;
use airprox_core::models::{LoadReport, PointOfInterestSet};
use airprox_core::ports::DatasetSource;
use airprox_store::PointSetStore;

/// Fetch the dataset, load it, and persist it for headless reuse.
///
/// An unreachable source leaves the previously persisted set untouched.
pub async fn refresh_points(
    source: &dyn DatasetSource,
    store: &dyn PointSetStore,
) -> Result<(PointOfInterestSet, LoadReport)> {
    let records = source.fetch().await.inspect_err(|e| {
        tracing::warn!("Dataset fetch from {} failed: {}", source.describe(), e);
    })?;

    let (set, report) = PointOfInterestSet::load_with_report(&records);
    for dropped in &report.dropped {
        tracing::warn!("{}", dropped.error);
    }

    store.save_points(&set)?;
    tracing::info!(
        "Loaded {} points from {} ({} dropped)",
        report.loaded,
        source.describe(),
        report.dropped_count()
    );

    Ok((set, report))
}
