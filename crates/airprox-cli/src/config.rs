use anyhow::{Context, Result};
use airprox_core::config::{CliConfigOverrides, LayeredConfig};

use crate::cli::Cli;

/// Resolve the effective configuration: defaults < file < env < CLI
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = &cli.config {
        config = config
            .load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
    }

    let mut config = config.load_from_env();

    config.update_from_cli(CliConfigOverrides {
        radius_meters: cli.radius,
        state_dir: cli.state_dir.clone(),
        dataset_url: None,
        gate_policy: cli.policy.map(Into::into),
    });

    config.validate().context("Invalid configuration")?;
    tracing::debug!("Effective configuration: {:?}", config);

    Ok(config)
}
