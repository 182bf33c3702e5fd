//! Configuration structures for glidenav settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::sites::{default_sites, SiteProfile};

/// Application configuration with nested sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Key bindings for every action
    #[serde(default)]
    pub keys: KeyBindings,

    /// Scroll physics tuning
    #[serde(default)]
    pub scroll: ScrollSettings,

    /// Terminal reader settings
    #[serde(default)]
    pub reader: ReaderSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Per-site profiles keyed by host
    #[serde(default = "default_sites")]
    pub sites: BTreeMap<String, SiteProfile>,
}

/// Key names accepted for each action.
///
/// Letters match case-insensitively, named keys (`ArrowLeft`, `PageDown`)
/// match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_scroll_up")]
    pub scroll_up: Vec<String>,

    #[serde(default = "default_scroll_down")]
    pub scroll_down: Vec<String>,

    #[serde(default = "default_prev_chapter")]
    pub prev_chapter: Vec<String>,

    #[serde(default = "default_next_chapter")]
    pub next_chapter: Vec<String>,

    #[serde(default = "default_fullscreen")]
    pub fullscreen: Vec<String>,

    #[serde(default = "default_all_chapters")]
    pub all_chapters: Vec<String>,
}

/// Scroll physics tuning. All values are per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollSettings {
    /// Maximum scroll speed (px/s)
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,

    /// Exponential decay rate after release (1/s); higher stops faster
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,

    /// Acceleration while a key is held (px/s²)
    #[serde(default = "default_accel_rate")]
    pub accel_rate: f64,

    /// Speed below which a released direction counts as stopped (px/s)
    #[serde(default = "default_stop_threshold")]
    pub stop_threshold: f64,
}

/// Terminal reader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderSettings {
    /// Interval between animation frames while scrolling (ms)
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Poll interval while idle (ms)
    #[serde(default = "default_idle_tick_ms")]
    pub idle_tick_ms: u64,

    /// Held key is treated as released after this long without a repeat,
    /// when the terminal cannot report releases (ms)
    #[serde(default = "default_key_release_timeout_ms")]
    pub key_release_timeout_ms: u64,

    /// Pixels per terminal row
    #[serde(default = "default_line_height")]
    pub line_height: f64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional, defaults to the cache directory)
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,
}

// Default value functions for serde
fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn default_scroll_up() -> Vec<String> {
    keys(&["w"])
}

fn default_scroll_down() -> Vec<String> {
    keys(&["s"])
}

fn default_prev_chapter() -> Vec<String> {
    keys(&["a", "ArrowLeft"])
}

fn default_next_chapter() -> Vec<String> {
    keys(&["d", "ArrowRight"])
}

fn default_fullscreen() -> Vec<String> {
    keys(&["f"])
}

fn default_all_chapters() -> Vec<String> {
    keys(&["q"])
}

fn default_max_speed() -> f64 {
    defaults::MAX_SPEED
}

fn default_decay_rate() -> f64 {
    defaults::DECAY_RATE
}

fn default_accel_rate() -> f64 {
    defaults::ACCEL_RATE
}

fn default_stop_threshold() -> f64 {
    defaults::STOP_THRESHOLD
}

fn default_frame_interval_ms() -> u64 {
    defaults::FRAME_INTERVAL_MS
}

fn default_idle_tick_ms() -> u64 {
    defaults::IDLE_TICK_MS
}

fn default_key_release_timeout_ms() -> u64 {
    defaults::KEY_RELEASE_TIMEOUT_MS
}

fn default_line_height() -> f64 {
    defaults::LINE_HEIGHT
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

// Default implementations
impl Default for Config {
    fn default() -> Self {
        Self {
            keys: KeyBindings::default(),
            scroll: ScrollSettings::default(),
            reader: ReaderSettings::default(),
            logging: LoggingSettings::default(),
            sites: default_sites(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            scroll_up: default_scroll_up(),
            scroll_down: default_scroll_down(),
            prev_chapter: default_prev_chapter(),
            next_chapter: default_next_chapter(),
            fullscreen: default_fullscreen(),
            all_chapters: default_all_chapters(),
        }
    }
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            max_speed: default_max_speed(),
            decay_rate: default_decay_rate(),
            accel_rate: default_accel_rate(),
            stop_threshold: default_stop_threshold(),
        }
    }
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            idle_tick_ms: default_idle_tick_ms(),
            key_release_timeout_ms: default_key_release_timeout_ms(),
            line_height: default_line_height(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
        }
    }
}
