//! Headless one-fix command implementation

use crate::cli::FixArgs;
use crate::output::OutputWriter;
use crate::output_types::FixOutput;
use crate::sinks::console_sinks;
use airprox_core::config::LayeredConfig;
use airprox_core::models::Fix;
use airprox_engine::{FixIngestor, FixOutcome, Sinks};
use airprox_geo::ProximityMatcher;
use airprox_store::FileStateStore;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use std::sync::Arc;

pub async fn execute(args: FixArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let fix = Fix::new(args.lat, args.lon).with_timestamp(Utc::now());
    if !fix.coordinate.is_in_valid_range() {
        bail!("Fix ({}, {}) is outside WGS 84 coordinate range", args.lat, args.lon);
    }

    let outcome = match handle(fix, config, console_sinks(output.is_json())).await {
        Ok(outcome) => outcome,
        Err(error) => {
            // Nothing was emitted; the next invocation starts from the same state
            output.error(&error);
            return Err(error).context("Headless fix aborted");
        }
    };

    if output.is_json() {
        output.result(FixOutput::from(outcome))?;
    } else {
        match outcome {
            FixOutcome::NoPointSet => {
                output.warning("No dataset persisted yet. Run 'airprox fetch' first")
            }
            FixOutcome::NoMatch => output.info("No airport nearby"),
            FixOutcome::Suppressed { point, distance_meters } => output.info(format!(
                "Already notified for {} ({:.2} m away)",
                point, distance_meters
            )),
            FixOutcome::Fired { sink_failures, .. } if sink_failures > 0 => {
                output.warning(format!("Notification recorded, {} sink(s) failed", sink_failures))
            }
            FixOutcome::Fired { .. } => {}
        }
    }

    Ok(())
}

/// Cold-start the engine and process one fix.
///
/// Failures before the ingestor exists are reported here; the ingestor
/// reports its own.
async fn handle(fix: Fix, config: &LayeredConfig, sinks: Sinks) -> airprox_core::Result<FixOutcome> {
    let errors = sinks.errors.clone();
    let started = FileStateStore::open(&config.state_dir.value).map(Arc::new).and_then(|store| {
        FixIngestor::cold_start(
            store.as_ref(),
            ProximityMatcher::new(config.radius_meters.value),
            config.gate_policy.value,
            store.clone(),
            sinks,
        )
    });

    match started {
        Ok(ingestor) => ingestor.ingest(&fix).await,
        Err(error) => {
            errors.report(&error);
            Err(error)
        }
    }
}
