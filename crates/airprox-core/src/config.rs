use crate::error::ConfigError;
use crate::models::GatePolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default trigger radius in meters
pub const DEFAULT_RADIUS_METERS: f64 = 50.0;

/// Default directory for persisted state
pub const DEFAULT_STATE_DIR: &str = ".airprox";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has at least the current precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() >= self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the proximity engine and its host
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub radius_meters: ConfigValue<f64>,
    pub state_dir: ConfigValue<PathBuf>,
    pub dataset_url: ConfigValue<Option<String>>,
    pub gate_policy: ConfigValue<GatePolicy>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            radius_meters: ConfigValue::new(DEFAULT_RADIUS_METERS, ConfigSource::Default),
            state_dir: ConfigValue::new(PathBuf::from(DEFAULT_STATE_DIR), ConfigSource::Default),
            dataset_url: ConfigValue::new(None, ConfigSource::Default),
            gate_policy: ConfigValue::new(GatePolicy::Latch, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Invalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig = toml::from_str(&content).map_err(|e| ConfigError::Invalid {
            key: "file".to_string(),
            reason: format!("Failed to parse TOML: {}", e),
        })?;

        if let Some(radius) = file_config.radius_meters {
            self.radius_meters.update(radius, ConfigSource::File);
        }

        if let Some(state_dir) = file_config.state_dir {
            self.state_dir.update(state_dir, ConfigSource::File);
        }

        if let Some(url) = file_config.dataset_url {
            self.dataset_url.update(Some(url), ConfigSource::File);
        }

        if let Some(policy) = file_config.gate_policy {
            self.gate_policy.update(policy, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // AIRPROX_RADIUS_METERS
        if let Ok(radius_str) = env::var("AIRPROX_RADIUS_METERS") {
            match parse_radius(&radius_str) {
                Ok(radius) => self.radius_meters.update(radius, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid AIRPROX_RADIUS_METERS value '{}': expected a positive number of meters",
                    radius_str
                ),
            }
        }

        // AIRPROX_STATE_DIR
        if let Ok(dir) = env::var("AIRPROX_STATE_DIR") {
            if dir.trim().is_empty() {
                tracing::warn!("Ignoring empty AIRPROX_STATE_DIR");
            } else {
                self.state_dir.update(PathBuf::from(dir), ConfigSource::Environment);
            }
        }

        // AIRPROX_DATASET_URL
        if let Ok(url) = env::var("AIRPROX_DATASET_URL") {
            self.dataset_url.update(Some(url), ConfigSource::Environment);
        }

        // AIRPROX_GATE_POLICY
        if let Ok(policy_str) = env::var("AIRPROX_GATE_POLICY") {
            match parse_gate_policy(&policy_str) {
                Ok(policy) => self.gate_policy.update(policy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid AIRPROX_GATE_POLICY value '{}': expected latch or rearm-on-exit",
                    policy_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(radius) = overrides.radius_meters {
            self.radius_meters.update(radius, ConfigSource::Cli);
        }

        if let Some(state_dir) = overrides.state_dir {
            self.state_dir.update(state_dir, ConfigSource::Cli);
        }

        if let Some(url) = overrides.dataset_url {
            self.dataset_url.update(Some(url), ConfigSource::Cli);
        }

        if let Some(policy) = overrides.gate_policy {
            self.gate_policy.update(policy, ConfigSource::Cli);
        }
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let radius = self.radius_meters.value;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ConfigError::Invalid {
                key: "radius_meters".to_string(),
                reason: format!("{} is not a positive distance", radius),
            });
        }
        Ok(())
    }

    /// The dataset URL, or an error naming the settings that could supply it
    pub fn require_dataset_url(&self) -> Result<&str, ConfigError> {
        self.dataset_url.value.as_deref().ok_or_else(|| ConfigError::Missing {
            key: "dataset_url (AIRPROX_DATASET_URL or --url)".to_string(),
        })
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "radius_meters".to_string(),
            (format!("{}", self.radius_meters.value), self.radius_meters.source),
        );

        map.insert(
            "state_dir".to_string(),
            (self.state_dir.value.display().to_string(), self.state_dir.source),
        );

        map.insert(
            "dataset_url".to_string(),
            (
                self.dataset_url.value.clone().unwrap_or_else(|| "(unset)".to_string()),
                self.dataset_url.source,
            ),
        );

        map.insert(
            "gate_policy".to_string(),
            (format!("{:?}", self.gate_policy.value), self.gate_policy.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    radius_meters: Option<f64>,
    state_dir: Option<PathBuf>,
    dataset_url: Option<String>,
    gate_policy: Option<GatePolicy>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub radius_meters: Option<f64>,
    pub state_dir: Option<PathBuf>,
    pub dataset_url: Option<String>,
    pub gate_policy: Option<GatePolicy>,
}

/// Parse a trigger radius in meters
pub fn parse_radius(s: &str) -> Result<f64, ConfigError> {
    let radius = s.trim().parse::<f64>().map_err(|e| ConfigError::Invalid {
        key: "radius_meters".to_string(),
        reason: format!("'{}' is not a number: {}", s, e),
    })?;

    if !radius.is_finite() || radius <= 0.0 {
        return Err(ConfigError::Invalid {
            key: "radius_meters".to_string(),
            reason: format!("{} is not a positive distance", radius),
        });
    }

    Ok(radius)
}

/// Parse gate policy from string
pub fn parse_gate_policy(s: &str) -> Result<GatePolicy, ConfigError> {
    match s.to_lowercase().as_str() {
        "latch" => Ok(GatePolicy::Latch),
        "rearm-on-exit" | "rearm_on_exit" | "rearm" => Ok(GatePolicy::RearmOnExit),
        _ => Err(ConfigError::Invalid {
            key: "gate_policy".to_string(),
            reason: format!("Invalid gate policy: {}. Use latch or rearm-on-exit", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.radius_meters.value, 50.0);
        assert_eq!(config.radius_meters.source, ConfigSource::Default);
        assert_eq!(config.state_dir.value, PathBuf::from(".airprox"));
        assert_eq!(config.dataset_url.value, None);
        assert_eq!(config.gate_policy.value, GatePolicy::Latch);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
radius_meters = 120.5
state_dir = "/var/lib/airprox"
dataset_url = "https://example.org/airports.json"
gate_policy = "rearm-on-exit"
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.radius_meters.value, 120.5);
        assert_eq!(config.radius_meters.source, ConfigSource::File);
        assert_eq!(config.state_dir.value, PathBuf::from("/var/lib/airprox"));
        assert_eq!(config.dataset_url.value.as_deref(), Some("https://example.org/airports.json"));
        assert_eq!(config.gate_policy.value, GatePolicy::RearmOnExit);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        let overrides = CliConfigOverrides {
            radius_meters: Some(75.0),
            state_dir: None,
            dataset_url: None,
            gate_policy: Some(GatePolicy::RearmOnExit),
        };

        config.update_from_cli(overrides);

        assert_eq!(config.radius_meters.value, 75.0);
        assert_eq!(config.radius_meters.source, ConfigSource::Cli);
        assert_eq!(config.gate_policy.source, ConfigSource::Cli);
        // These should still be defaults
        assert_eq!(config.state_dir.source, ConfigSource::Default);
        assert_eq!(config.dataset_url.source, ConfigSource::Default);
    }

    #[test]
    fn test_validate_radius() {
        let mut config = LayeredConfig::with_defaults();
        assert!(config.validate().is_ok());

        config.radius_meters.update(0.0, ConfigSource::Cli);
        assert!(config.validate().is_err());

        config.radius_meters.update(f64::NAN, ConfigSource::Cli);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_require_dataset_url() {
        let mut config = LayeredConfig::with_defaults();
        assert!(matches!(config.require_dataset_url(), Err(ConfigError::Missing { .. })));

        config.dataset_url.update(Some("http://localhost/a.json".to_string()), ConfigSource::Cli);
        assert_eq!(config.require_dataset_url().unwrap(), "http://localhost/a.json");
    }

    #[test]
    fn test_parse_radius() {
        assert_eq!(parse_radius("50").unwrap(), 50.0);
        assert_eq!(parse_radius(" 12.5 ").unwrap(), 12.5);
        assert!(parse_radius("-3").is_err());
        assert!(parse_radius("inf").is_err());
        assert!(parse_radius("far").is_err());
    }

    #[test]
    fn test_parse_gate_policy() {
        assert_eq!(parse_gate_policy("latch").unwrap(), GatePolicy::Latch);
        assert_eq!(parse_gate_policy("REARM-ON-EXIT").unwrap(), GatePolicy::RearmOnExit);
        assert!(parse_gate_policy("alarm").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert!(map.contains_key("radius_meters"));
        assert!(map.contains_key("state_dir"));
        assert!(map.contains_key("dataset_url"));
        assert!(map.contains_key("gate_policy"));

        let (radius, source) = &map["radius_meters"];
        assert_eq!(radius, "50");
        assert_eq!(*source, ConfigSource::Default);
    }
}
