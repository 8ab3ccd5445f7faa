//! Status command implementation

use crate::cli::StatusArgs;
use crate::output::OutputWriter;
use crate::output_types::{ConfigRow, StatusOutput, SuppressedRow};
use airprox_core::config::LayeredConfig;
use airprox_store::{FileStateStore, PointSetStore, SuppressionStore};
use anyhow::{Context, Result};

pub fn execute(args: StatusArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let store = FileStateStore::open(&config.state_dir.value)
        .context("Failed to open state directory")?;
    let point_count = store.load_points().context("Failed to read persisted dataset")?.map(|s| s.len());
    let suppression = store.snapshot().context("Failed to read suppression state")?;

    let suppressed: Vec<SuppressedRow> = suppression
        .iter()
        .map(|(key, entry)| SuppressedRow {
            key: key.to_string(),
            fired_at: entry.fired_at.to_rfc3339(),
            latitude: entry.coordinate.latitude,
            longitude: entry.coordinate.longitude,
        })
        .collect();

    let mut config_rows: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source: format!("{:?}", source) })
        .collect();
    config_rows.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        return output.result(StatusOutput {
            state_dir: store.dir().display().to_string(),
            point_count,
            suppressed,
            config: config_rows,
        });
    }

    output.section("Proximity State");
    output.kv("State directory", store.dir().display());
    match point_count {
        Some(count) => output.kv("Airports", count),
        None => output.kv("Airports", "none persisted (run 'airprox fetch')"),
    }
    output.kv("Suppressed airports", suppressed.len());

    if args.verbose {
        output.section("Suppressed");
        output.table(suppressed);
    }

    output.section("Configuration");
    output.table(config_rows);

    Ok(())
}
