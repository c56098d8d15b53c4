//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Fade delay between screens
    #[serde(default = "default_transition_delay_ms")]
    pub transition_delay_ms: u64,
    /// Simulated screenshot processing time
    #[serde(default = "default_extraction_delay_ms")]
    pub extraction_delay_ms: u64,
    /// Pull-to-refresh spinner duration on trip detail
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,
    /// How often the real-time driver calls `tick`
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_transition_delay_ms() -> u64 {
    300
}

fn default_extraction_delay_ms() -> u64 {
    2000
}

fn default_refresh_delay_ms() -> u64 {
    1500
}

fn default_tick_interval_ms() -> u64 {
    16
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            transition_delay_ms: default_transition_delay_ms(),
            extraction_delay_ms: default_extraction_delay_ms(),
            refresh_delay_ms: default_refresh_delay_ms(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExtractionConfig {
    /// Fixed RNG seed for template selection (entropy when absent)
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_interval_secs")]
    pub interval_secs: u64,
}

fn default_metrics_interval_secs() -> u64 {
    10
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval_secs() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OutputConfig {
    /// JSONL file for state snapshots (stdout when absent)
    #[serde(default)]
    pub snapshots_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    transition_delay_ms: u64,
    extraction_delay_ms: u64,
    refresh_delay_ms: u64,
    tick_interval_ms: u64,
    extraction_seed: Option<u64>,
    metrics_interval_secs: u64,
    snapshots_file: Option<String>,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transition_delay_ms: default_transition_delay_ms(),
            extraction_delay_ms: default_extraction_delay_ms(),
            refresh_delay_ms: default_refresh_delay_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            extraction_seed: None,
            metrics_interval_secs: default_metrics_interval_secs(),
            snapshots_file: None,
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Pick the config file: explicit path, then `CONFIG_FILE`, then the dev default
    pub fn resolve_config_path(explicit: Option<&str>) -> String {
        if let Some(path) = explicit {
            return path.to_string();
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self {
            transition_delay_ms: toml_config.timing.transition_delay_ms,
            extraction_delay_ms: toml_config.timing.extraction_delay_ms,
            refresh_delay_ms: toml_config.timing.refresh_delay_ms,
            tick_interval_ms: toml_config.timing.tick_interval_ms.max(1),
            extraction_seed: toml_config.extraction.seed,
            metrics_interval_secs: toml_config.metrics.interval_secs,
            snapshots_file: toml_config.output.snapshots_file,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "config_load_failed_using_defaults");
                Self::default()
            }
        }
    }

    pub fn transition_delay_ms(&self) -> u64 {
        self.transition_delay_ms
    }

    pub fn extraction_delay_ms(&self) -> u64 {
        self.extraction_delay_ms
    }

    pub fn refresh_delay_ms(&self) -> u64 {
        self.refresh_delay_ms
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    pub fn extraction_seed(&self) -> Option<u64> {
        self.extraction_seed
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn snapshots_file(&self) -> Option<&str> {
        self.snapshots_file.as_deref()
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests and the replay driver to pin the extractor seed
    pub fn with_extraction_seed(mut self, seed: u64) -> Self {
        self.extraction_seed = Some(seed);
        self
    }

    pub fn with_snapshots_file(mut self, path: &str) -> Self {
        self.snapshots_file = Some(path.to_string());
        self
    }
}
