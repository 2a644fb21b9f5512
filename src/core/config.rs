//! Application configuration with documented defaults
//!
//! Values come from `AppConfig::default()`, optionally overlaid by a TOML
//! file, and finally by command-line flags in the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{PortfolioError, Result};

/// Configuration for a dashboard session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    // === CONTENT ===
    /// Directory holding `experiences.toml`, `taxonomy.toml` and `profile.toml`
    ///
    /// When unset, the dataset compiled into the binary is used.
    pub data_dir: Option<PathBuf>,

    // === MOTION ===
    /// Accessibility preference: render the ambient background once and
    /// stop per-frame updates, and disable carousel auto-advance
    pub reduced_motion: bool,

    /// Input poll timeout, one animation frame (milliseconds)
    ///
    /// At 50ms the background morphs at ~20fps, which is plenty for blobs
    /// whose cycles last 20-35 seconds.
    pub frame_interval_ms: u64,

    /// Highlight carousel auto-advance period (milliseconds, 0 = off)
    pub highlight_interval_ms: u64,

    // === LOGGING ===
    /// Default tracing filter directive; `RUST_LOG` takes precedence
    pub log_filter: String,

    /// Write logs to this file instead of stderr
    ///
    /// The terminal page owns the screen, so without a file only warnings
    /// are kept and they are flushed after the terminal is restored.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            reduced_motion: false,
            frame_interval_ms: 50,
            highlight_interval_ms: 6000,
            log_filter: "career_dashboard=info".to_string(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|source| PortfolioError::TomlError {
                file: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(10..=1000).contains(&self.frame_interval_ms) {
            return Err(PortfolioError::InvalidConfig(format!(
                "frame_interval_ms ({}) should be within 10..=1000",
                self.frame_interval_ms
            )));
        }

        if self.highlight_interval_ms != 0 && self.highlight_interval_ms < self.frame_interval_ms {
            return Err(PortfolioError::InvalidConfig(format!(
                "highlight_interval_ms ({}) should be 0 or at least frame_interval_ms ({})",
                self.highlight_interval_ms, self.frame_interval_ms
            )));
        }

        if self.log_filter.trim().is_empty() {
            return Err(PortfolioError::InvalidConfig("log_filter must not be empty".into()));
        }

        Ok(())
    }

    /// Whether the highlight carousel should advance on its own
    pub fn carousel_auto_advance(&self) -> bool {
        !self.reduced_motion && self.highlight_interval_ms > 0
    }
}
