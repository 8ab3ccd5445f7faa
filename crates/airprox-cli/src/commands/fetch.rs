//! Fetch command implementation

use crate::cli::FetchArgs;
use crate::dataset::{FileDatasetSource, HttpDatasetSource};
use crate::output::OutputWriter;
use crate::output_types::{DroppedOutput, FetchOutput};
use airprox_core::config::LayeredConfig;
use airprox_core::ports::DatasetSource;
use airprox_engine::refresh_points;
use airprox_store::FileStateStore;
use anyhow::{Context, Result};

pub async fn execute(args: FetchArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let source = resolve_source(args, config)?;
    let store = FileStateStore::open(&config.state_dir.value)
        .context("Failed to open state directory")?;

    let (_, report) = match refresh_points(source.as_ref(), &store).await {
        Ok(loaded) => loaded,
        Err(error) => {
            output.error(&error);
            output.info("The previously persisted dataset, if any, is unchanged");
            return Err(error).context("Dataset fetch failed");
        }
    };

    let dropped: Vec<DroppedOutput> = report
        .dropped
        .iter()
        .map(|d| DroppedOutput {
            index: d.index,
            name: d.name.clone().unwrap_or_default(),
            reason: d.error.to_string(),
        })
        .collect();

    if output.is_json() {
        output.result(FetchOutput {
            source: source.describe(),
            loaded: report.loaded,
            dropped,
            state_dir: store.dir().display().to_string(),
        })?;
    } else {
        output.success(format!(
            "Persisted {} airports from {} to {}",
            report.loaded,
            source.describe(),
            store.dir().display()
        ));
        if !dropped.is_empty() {
            output.warning(format!("Dropped {} records with unusable coordinates", dropped.len()));
            output.table(dropped);
        }
    }

    Ok(())
}

fn resolve_source(args: FetchArgs, config: &LayeredConfig) -> Result<Box<dyn DatasetSource>> {
    if let Some(path) = args.file {
        return Ok(Box::new(FileDatasetSource::new(path)));
    }

    let url = match args.url {
        Some(url) => url,
        None => config.require_dataset_url()?.to_string(),
    };
    Ok(Box::new(HttpDatasetSource::new(url)))
}
