//! Platform-specific directory management
//!
//! Provides platform-specific paths for the cache and config directories.
//! Follows XDG Base Directory Specification on Linux and standard locations on macOS.
//!
//! Environment variables can override default directories:
//! - `XUINO_CACHE_DIR` - Override cache directory
//! - `XUINO_CONFIG_DIR` - Override config directory

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable names for directory overrides
pub const ENV_CACHE_DIR: &str = "XUINO_CACHE_DIR";
pub const ENV_CONFIG_DIR: &str = "XUINO_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "xuino";

/// Subdirectory holding compiled libraries
const COMPILE_SUBDIR: &str = "compile";

/// Platform-specific directory provider for xuino
#[derive(Debug, Clone)]
pub struct XuinoDirs {
    cache_dir: PathBuf,
    config_dir: PathBuf,
}

impl XuinoDirs {
    /// Create a new `XuinoDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache_dir: env::var_os(ENV_CACHE_DIR)
                .map_or_else(|| platform_dir(dirs::cache_dir(), ".cache"), PathBuf::from),
            config_dir: env::var_os(ENV_CONFIG_DIR)
                .map_or_else(|| platform_dir(dirs::config_dir(), ".config"), PathBuf::from),
        }
    }

    /// Use explicit directories, ignoring the environment
    #[must_use]
    pub fn with_roots(cache_dir: PathBuf, config_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            config_dir,
        }
    }

    /// Get the cache directory path
    ///
    /// - Linux: `$XDG_CACHE_HOME/xuino` or `~/.cache/xuino`
    /// - macOS: `~/Library/Caches/xuino`
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/xuino` or `~/.config/xuino`
    /// - macOS: `~/Library/Application Support/xuino`
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Default root for compiled library caches
    #[must_use]
    pub fn compile_root(&self) -> PathBuf {
        self.cache_dir.join(COMPILE_SUBDIR)
    }

    /// Get the global config file path
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}

impl Default for XuinoDirs {
    fn default() -> Self {
        Self::new()
    }
}

fn platform_dir(base: Option<PathBuf>, home_fallback: &str) -> PathBuf {
    base.map(|p| p.join(APP_NAME)).unwrap_or_else(|| {
        dirs::home_dir()
            .map(|h| h.join(home_fallback).join(APP_NAME))
            .unwrap_or_else(|| PathBuf::from(".").join(home_fallback).join(APP_NAME))
    })
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
