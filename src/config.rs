//! # Run Configuration
//!
//! A run is described by a TOML file; every table and field is optional.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! trace = false
//!
//! [request]
//! initial_position = 150.0
//! initial_velocity = 0.0
//! goal_position = 850.0
//! max_velocity = 75.0
//! max_acceleration = 10.0
//!
//! [sampler]
//! time_step = 0.1
//!
//! [output]
//! path = "trajectories.csv"
//! format = "csv"
//!
//! [mirror]
//! enabled = true
//! address = "127.0.0.1:8082"
//! pacing_ms = 100
//! ```
//!
//! ## Example: Rust Usage
//!
//! ```rust
//! use trapezoid_rs::config::Config;
//! let toml_str = r#"
//! [request]
//! goal_position = 100.0
//! max_velocity = 10.0
//! max_acceleration = 1.0
//! "#;
//! let config: Config = toml::from_str(toml_str).unwrap();
//! assert_eq!(config.request.goal_position, 100.0);
//! assert_eq!(config.sampler.time_step, 0.1);
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controller::ControllerOptions;
use crate::motion::{MotionRequest, DEFAULT_TIME_STEP};
use crate::sink::{DEFAULT_MIRROR_ADDRESS, DEFAULT_PACING};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration for one run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub request: MotionRequest,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SamplerConfig {
    #[serde(default = "default_time_step")]
    pub time_step: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            time_step: default_time_step(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Jsonl,
}

/// Trajectory file written during the run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_enabled")]
    pub enabled: bool,
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default = "default_output_format")]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: default_output_enabled(),
            path: default_output_path(),
            format: default_output_format(),
        }
    }
}

/// Live TCP mirror to an external viewer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_mirror_address")]
    pub address: String,
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: default_mirror_address(),
            pacing_ms: default_pacing_ms(),
        }
    }
}

impl MirrorConfig {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }
}

impl Config {
    /// Check settings that would make a run impossible regardless of the request.
    ///
    /// The request itself is validated when the move is planned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dt = self.sampler.time_step;
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "sampler.time_step must be finite and > 0, got {}",
                dt
            )));
        }
        if self.output.enabled && self.output.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output.path must not be empty".to_string()));
        }
        if self.mirror.enabled && self.mirror.address.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "mirror.address must not be empty when the mirror is enabled".to_string(),
            ));
        }
        Ok(())
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            time_step: self.sampler.time_step,
            trace: self.trace,
        }
    }
}

// Default value functions
fn default_time_step() -> f64 { DEFAULT_TIME_STEP }
fn default_output_enabled() -> bool { true }
fn default_output_path() -> PathBuf { PathBuf::from("trajectories.csv") }
fn default_output_format() -> OutputFormat { OutputFormat::Csv }
fn default_mirror_address() -> String { DEFAULT_MIRROR_ADDRESS.to_string() }
fn default_pacing_ms() -> u64 { DEFAULT_PACING.as_millis() as u64 }

/// Load configuration from a TOML file at the given path.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::error!("Failed to parse config TOML: {}", e);
                Err(ConfigError::Toml(e))
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            Err(ConfigError::Io(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.sampler.time_step, 0.1);
        assert!(config.output.enabled);
        assert_eq!(config.output.path, PathBuf::from("trajectories.csv"));
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert!(!config.mirror.enabled);
        assert_eq!(config.mirror.address, "127.0.0.1:8082");
        assert_eq!(config.mirror.pacing(), Duration::from_millis(100));
        assert!(!config.trace);
        assert_eq!(config.request, MotionRequest::default());
    }

    #[test]
    fn test_load_config_success() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("run.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(
            file,
            "trace = true\n[request]\ninitial_position = -150.0\ngoal_position = 550.0\nmax_velocity = 75.0\nmax_acceleration = 10.0\n[mirror]\nenabled = true"
        )
        .unwrap();
        file.flush().unwrap();
        let config = load_config(file_path.to_str().unwrap()).unwrap();
        assert!(config.trace);
        assert_eq!(config.request.initial_position, -150.0);
        assert_eq!(config.request.goal_position, 550.0);
        assert!(config.mirror.enabled);
        // Defaults for missing fields
        assert_eq!(config.request.initial_velocity, 0.0);
        assert_eq!(config.mirror.pacing_ms, 100);
        assert_eq!(config.sampler.time_step, 0.1);
        assert!(config.controller_options().trace);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent_file.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.toml");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "not a valid toml").unwrap();
        file.flush().unwrap();
        let result = load_config(file_path.to_str().unwrap());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_output_format_parsing() {
        let config: Config = toml::from_str("[output]\nformat = \"jsonl\"\npath = \"run.jsonl\"").unwrap();
        assert_eq!(config.output.format, OutputFormat::Jsonl);
        assert_eq!(config.output.path, PathBuf::from("run.jsonl"));
        assert!(toml::from_str::<Config>("[output]\nformat = \"xml\"").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = Config::default();
        config.sampler.time_step = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.mirror.enabled = true;
        config.mirror.address = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.output.path = PathBuf::new();
        assert!(config.validate().is_err());
        config.output.enabled = false;
        assert!(config.validate().is_ok());
    }
}
