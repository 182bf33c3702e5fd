//! XDG Base Directory support for glidenav.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "glidenav";

/// Get the configuration directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME/glidenav` or `~/.config/glidenav`.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine config directory")
}

/// Get the cache directory following XDG conventions.
///
/// Returns `$XDG_CACHE_HOME/glidenav` or `~/.cache/glidenav`.
pub fn get_cache_dir() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine cache directory")
}
