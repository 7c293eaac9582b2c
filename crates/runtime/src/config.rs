//! Configuration management for the Infiniscroll runtime.
//!
//! Configuration is loaded from TOML files in the following locations (in order):
//! 1. `<platform config dir>/infiniscroll/config.toml`
//! 2. `~/.config/infiniscroll/config.toml`
//! 3. `./infiniscroll.toml` (current directory, for development)

use anyhow::{Context, Result};
use directories::ProjectDirs;
use infiniscroll_core::ControllerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upper bound for any configured interval, in milliseconds.
pub const MAX_INTERVAL_MS: u64 = 2000;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Debounce and cool-down timing.
    pub timing: TimingConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Timing of the jump controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Quiet period after the last scroll event before a jump is considered.
    /// Too short jumps mid-momentum; too long makes the jump visible.
    #[serde(default = "default_interval")]
    pub debounce_ms: u64,

    /// Time after a jump before smooth scrolling is re-enabled.
    #[serde(default = "default_interval")]
    pub jump_cooldown_ms: u64,

    /// Time after initial positioning before smooth scrolling is enabled.
    #[serde(default = "default_interval")]
    pub smooth_enable_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_interval(),
            jump_cooldown_ms: default_interval(),
            smooth_enable_delay_ms: default_interval(),
        }
    }
}

impl From<&TimingConfig> for ControllerConfig {
    fn from(config: &TimingConfig) -> Self {
        ControllerConfig {
            debounce: Duration::from_millis(config.debounce_ms),
            jump_cooldown: Duration::from_millis(config.jump_cooldown_ms),
            smooth_enable_delay: Duration::from_millis(config.smooth_enable_delay_ms),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions for serde
fn default_interval() -> u64 {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

/// A value that was corrected during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub message: String,
}

impl Config {
    /// Load configuration from standard locations.
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self> {
        for path in config_paths() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::load_from_path(&path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Clamp out-of-range values, returning a warning for each correction.
    pub fn validate(&mut self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for (field, value) in [
            ("timing.debounce_ms", &mut self.timing.debounce_ms),
            ("timing.jump_cooldown_ms", &mut self.timing.jump_cooldown_ms),
            ("timing.smooth_enable_delay_ms", &mut self.timing.smooth_enable_delay_ms),
        ] {
            if *value > MAX_INTERVAL_MS {
                warnings.push(ConfigWarning {
                    field,
                    message: format!("{} ms exceeds {} ms, clamped", value, MAX_INTERVAL_MS),
                });
                *value = MAX_INTERVAL_MS;
            }
        }

        let level = self.logging.level.to_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            self.logging.level = level;
        } else {
            warnings.push(ConfigWarning {
                field: "logging.level",
                message: format!("unknown level '{}', using 'info'", self.logging.level),
            });
            self.logging.level = default_log_level();
        }

        warnings
    }

    /// Controller timing derived from this configuration.
    pub fn controller_config(&self) -> ControllerConfig {
        (&self.timing).into()
    }
}

/// Get all possible config file paths in priority order.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(proj_dirs) = ProjectDirs::from("com", "infiniscroll", "infiniscroll") {
        paths.push(proj_dirs.config_dir().join("config.toml"));
    }

    if let Some(home) = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
        paths.push(home.join(".config").join("infiniscroll").join("config.toml"));
    }

    paths.push(PathBuf::from("infiniscroll.toml"));

    paths
}
