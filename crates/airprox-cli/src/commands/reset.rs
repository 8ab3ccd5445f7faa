//! Reset command implementation

use crate::cli::ResetArgs;
use crate::output::OutputWriter;
use crate::output_types::ResetOutput;
use airprox_core::config::LayeredConfig;
use airprox_store::{FileStateStore, SuppressionStore};
use anyhow::{Context, Result};

pub fn execute(args: ResetArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let store = FileStateStore::open(&config.state_dir.value)
        .context("Failed to open state directory")?;

    let mut tx = store.begin().context("Failed to lock suppression state")?;
    let cleared = match &args.point {
        Some(point) => usize::from(tx.state_mut().clear(point)),
        None => tx.state_mut().clear_all(),
    };
    if cleared > 0 {
        tx.commit().context("Failed to write suppression state")?;
    }

    if output.is_json() {
        return output.result(ResetOutput { cleared });
    }

    match (&args.point, cleared) {
        (Some(point), 0) => output.warning(format!("{} was not suppressed", point)),
        (Some(point), _) => output.success(format!("Re-armed {}", point)),
        (None, count) => output.success(format!("Re-armed {} airports", count)),
    }

    Ok(())
}
