//! Foreground watch command implementation

use crate::cli::WatchArgs;
use crate::dataset::HttpDatasetSource;
use crate::output::OutputWriter;
use crate::output_types::WatchOutput;
use crate::sinks::console_sinks;
use airprox_core::config::LayeredConfig;
use airprox_core::models::{Fix, PointOfInterestSet};
use airprox_engine::{refresh_points, FixIngestor};
use airprox_geo::ProximityMatcher;
use airprox_store::{FileStateStore, PointSetStore};
use anyhow::{Context, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

pub async fn execute(args: WatchArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let store = Arc::new(
        FileStateStore::open(&config.state_dir.value).context("Failed to open state directory")?,
    );
    let points = load_or_fetch_points(store.as_ref(), config, output).await?;

    let mut ingestor = FixIngestor::new(
        points.map(Arc::new),
        ProximityMatcher::new(config.radius_meters.value),
        config.gate_policy.value,
        store.clone(),
        console_sinks(output.is_json()),
    )
    .with_points_store(store.clone());

    let skipped = Arc::new(AtomicUsize::new(0));
    let summary = match args.file {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            ingestor.run(fix_stream(BufReader::new(file), skipped.clone())).await
        }
        None => {
            output.info("Reading fixes as 'lat,lon' lines from stdin (Ctrl-D to stop)");
            ingestor.run(fix_stream(BufReader::new(tokio::io::stdin()), skipped.clone())).await
        }
    };

    let skipped = skipped.load(Ordering::Relaxed);
    if output.is_json() {
        output.result(WatchOutput::new(summary, skipped))?;
    } else {
        output.section("Summary");
        output.kv("Fixes processed", summary.processed);
        output.kv("Notifications", summary.fired);
        output.kv("Suppressed", summary.suppressed);
        output.kv("No match", summary.no_match);
        output.kv("Failed", summary.failed);
        if skipped > 0 {
            output.warning(format!("Skipped {} unparseable lines", skipped));
        }
    }

    Ok(())
}

/// Use the persisted set, fetching one first if none exists and a URL is configured
async fn load_or_fetch_points(
    store: &FileStateStore,
    config: &LayeredConfig,
    output: &OutputWriter,
) -> Result<Option<PointOfInterestSet>> {
    if let Some(points) = store.load_points().context("Failed to load persisted dataset")? {
        return Ok(Some(points));
    }

    let Some(url) = config.dataset_url.value.as_deref() else {
        output.warning("No dataset persisted yet; matching starts once 'airprox fetch' succeeds");
        return Ok(None);
    };

    match refresh_points(&HttpDatasetSource::new(url), store).await {
        Ok((set, _)) => Ok(Some(set)),
        Err(error) => {
            output.warning(format!("{}; matching starts once 'airprox fetch' succeeds", error));
            Ok(None)
        }
    }
}

/// Turn `lat,lon` lines into fixes in arrival order, counting lines that do not parse
fn fix_stream<R>(reader: R, skipped: Arc<AtomicUsize>) -> impl futures::Stream<Item = Fix>
where
    R: AsyncBufRead + Unpin,
{
    let lines = reader.lines();
    stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Stopped reading fixes: {}", e);
                None
            }
        }
    })
    .filter_map(move |line| {
        let skipped = skipped.clone();
        async move {
            if line.trim().is_empty() {
                return None;
            }
            let fix = parse_fix_line(&line);
            if fix.is_none() {
                tracing::warn!("Ignoring unparseable fix line '{}'", line);
                skipped.fetch_add(1, Ordering::Relaxed);
            }
            fix
        }
    })
}

/// Parse `lat,lon` (comma or whitespace separated)
fn parse_fix_line(line: &str) -> Option<Fix> {
    let mut parts = line.split(|c: char| c == ',' || c.is_whitespace()).filter(|p| !p.is_empty());
    let lat = parts.next()?.parse::<f64>().ok()?;
    let lon = parts.next()?.parse::<f64>().ok()?;
    let fix = Fix::new(lat, lon).with_timestamp(Utc::now());
    if parts.next().is_some() || !fix.coordinate.is_in_valid_range() {
        return None;
    }
    Some(fix)
}
