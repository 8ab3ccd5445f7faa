use airprox_core::models::GatePolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// airprox - Airport proximity notifier
#[derive(Parser, Debug)]
#[command(name = "airprox")]
#[command(about = "Notify once when the device comes near a known airport", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the persisted point set and suppression state
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Trigger radius in meters
    #[arg(long, global = true, value_name = "METERS")]
    pub radius: Option<f64>,

    /// How fired airports are re-armed
    #[arg(long, global = true)]
    pub policy: Option<PolicyArg>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Gate policy selection
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum PolicyArg {
    /// Notify once per airport until reset
    Latch,
    /// Notify again after leaving and re-entering the radius
    RearmOnExit,
}

impl From<PolicyArg> for GatePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Latch => GatePolicy::Latch,
            PolicyArg::RearmOnExit => GatePolicy::RearmOnExit,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the airport dataset and persist it for headless use
    Fetch(FetchArgs),

    /// Handle a single fix headlessly, then exit
    Fix(FixArgs),

    /// Foreground mode: process fixes as "lat,lon" lines
    Watch(WatchArgs),

    /// Show persisted state and effective configuration
    Status(StatusArgs),

    /// Clear suppression so airports can notify again
    Reset(ResetArgs),
}

#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Dataset URL (JSON array of airport records)
    #[arg(long, conflicts_with = "file")]
    pub url: Option<String>,

    /// Local dataset file instead of a URL
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct FixArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Read fixes from a file instead of stdin
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// List every suppressed airport
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct ResetArgs {
    /// Only re-arm this airport (suppression key, usually its name)
    #[arg(long)]
    pub point: Option<String>,
}
