//! Configuration management for glidenav.
//!
//! This crate provides configuration loading, saving, and validation
//! with support for TOML format and XDG directory conventions.

mod settings;
mod sites;
mod xdg;

pub use settings::{Config, KeyBindings, LoggingSettings, ReaderSettings, ScrollSettings};
pub use sites::{default_sites, SiteProfile};
pub use xdg::{get_cache_dir, get_config_dir};

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Default values as constants
pub mod defaults {
    pub const MAX_SPEED: f64 = 1800.0;
    pub const DECAY_RATE: f64 = 18.0;
    pub const ACCEL_RATE: f64 = 1500.0;
    pub const STOP_THRESHOLD: f64 = 1.0;
    pub const SCROLL_SPEED: f64 = 1.0;
    pub const FRAME_INTERVAL_MS: u64 = 16;
    pub const IDLE_TICK_MS: u64 = 250;
    pub const KEY_RELEASE_TIMEOUT_MS: u64 = 700;
    pub const LINE_HEIGHT: f64 = 18.0;
    pub const MIN_LOG_LEVEL: &str = "info";
    pub const MAX_LOG_ENTRIES: usize = 500;
    pub const LOCAL_SITE: &str = "local";
}

impl Config {
    /// Load configuration from the XDG config directory.
    ///
    /// On first run, creates config file with default values.
    /// Auto-completes missing keys with default values.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from an explicit path.
    ///
    /// Behaves like [`Config::load`]: a missing file is created with
    /// defaults and an incomplete file is rewritten in normalized form.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let original_content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::validate_content(&original_content)?;

        // Serialize back to get normalized content
        let normalized_content = toml::to_string_pretty(&config)?;
        if original_content != normalized_content {
            config.save_to(path)?;
        }

        Ok(config)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Get path to config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    /// Get default path to log file.
    pub fn default_log_path() -> Result<PathBuf> {
        Ok(get_cache_dir()?.join("glidenav.log"))
    }

    /// Parse and validate config content.
    pub fn validate_content(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Check tuning values and site multipliers.
    pub fn validate(&self) -> Result<()> {
        let scroll = &self.scroll;
        for (name, value) in [
            ("scroll.max_speed", scroll.max_speed),
            ("scroll.decay_rate", scroll.decay_rate),
            ("scroll.accel_rate", scroll.accel_rate),
            ("scroll.stop_threshold", scroll.stop_threshold),
            ("reader.line_height", self.reader.line_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                bail!("{} must be a positive number, got {}", name, value);
            }
        }

        if scroll.stop_threshold >= scroll.max_speed {
            bail!(
                "scroll.stop_threshold ({}) must be below scroll.max_speed ({})",
                scroll.stop_threshold,
                scroll.max_speed
            );
        }

        if self.reader.frame_interval_ms == 0 {
            bail!("reader.frame_interval_ms must be at least 1");
        }

        for (host, site) in &self.sites {
            if !site.scroll_speed.is_finite() || site.scroll_speed <= 0.0 {
                bail!(
                    "sites.\"{}\".scroll_speed must be a positive number, got {}",
                    host,
                    site.scroll_speed
                );
            }
        }

        Ok(())
    }

    /// Profile for the given host, if configured.
    pub fn site(&self, host: &str) -> Option<&SiteProfile> {
        self.sites.get(host)
    }
}
