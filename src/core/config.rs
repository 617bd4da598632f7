//! Configuration management
//!
//! Settings come from two TOML files with the same shape:
//!
//! - the global `config.toml` in the config directory
//! - the project-local `.xuino.toml`, whose values take precedence
//!
//! ```toml
//! [xuino]
//! arduino_root = "/usr/share/arduino"
//! arduino_ver = "1.0.5"
//! compile_root = "~/.xuino"
//! library_dirs = ["~/sketchbook/libraries"]
//! ```
//!
//! The merged file is resolved once into [`Settings`], which is then passed
//! explicitly to everything that needs it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::defaults::{DEFAULT_ARDUINO_ROOT, PROJECT_CONFIG_FILE};
use crate::core::board::{self, Boards};
use crate::core::catalog::DependencyCatalog;
use crate::error::ConfigError;
use crate::infra::dirs::{expand_home, XuinoDirs};

/// Contents of one config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XuinoConfig {
    /// The `[xuino]` table
    #[serde(default)]
    pub xuino: XuinoSection,
}

/// Settings in the `[xuino]` table. Unset values fall through to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XuinoSection {
    /// Arduino installation root
    pub arduino_root: Option<String>,

    /// Arduino version, e.g. "1.0.5"
    pub arduino_ver: Option<String>,

    /// Where compiled libraries are cached
    pub compile_root: Option<String>,

    /// Extra directories searched for libraries, in order
    pub library_dirs: Option<Vec<String>>,

    /// Directory with custom build recipes
    pub recipe_dir: Option<String>,

    /// Extra dependency catalog (JSON) overlaid on the builtin one
    pub catalog: Option<String>,
}

impl XuinoConfig {
    /// Load a config file. A missing file yields the default configuration.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load the global config, then overlay the project config
    pub fn load_layered(global: &Path, project: &Path) -> Result<Self, ConfigError> {
        let global = Self::load_from_path(global)?;
        let project = Self::load_from_path(project)?;
        Ok(global.overlay(project))
    }

    /// Values set in `other` replace values in `self`
    #[must_use]
    pub fn overlay(self, other: Self) -> Self {
        let base = self.xuino;
        let top = other.xuino;
        Self {
            xuino: XuinoSection {
                arduino_root: top.arduino_root.or(base.arduino_root),
                arduino_ver: top.arduino_ver.or(base.arduino_ver),
                compile_root: top.compile_root.or(base.compile_root),
                library_dirs: top.library_dirs.or(base.library_dirs),
                recipe_dir: top.recipe_dir.or(base.recipe_dir),
                catalog: top.catalog.or(base.catalog),
            },
        }
    }
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Arduino installation root
    pub arduino_root: PathBuf,
    /// Arduino version with the dots removed (1.0.5 -> 105)
    pub arduino_ver: u32,
    /// Root of the compiled library cache
    pub compile_root: PathBuf,
    /// Extra library search roots, searched before `<arduino_root>/libraries`
    pub library_dirs: Vec<PathBuf>,
    /// Directory with custom build recipes
    pub recipe_dir: Option<PathBuf>,
    /// Dependency catalog overlay
    pub catalog: Option<PathBuf>,
}

impl Settings {
    /// Load and resolve settings for a project directory
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let dirs = XuinoDirs::new();
        let config = XuinoConfig::load_layered(
            &dirs.global_config_path(),
            &project_dir.join(PROJECT_CONFIG_FILE),
        )?;
        Self::resolve(&config, project_dir, &dirs)
    }

    /// Resolve a merged config
    ///
    /// Relative paths are taken relative to `project_dir`. If no version is
    /// configured it is read from `<arduino_root>/lib/version.txt`.
    pub fn resolve(
        config: &XuinoConfig,
        project_dir: &Path,
        dirs: &XuinoDirs,
    ) -> Result<Self, ConfigError> {
        let section = &config.xuino;
        let path = |raw: &str| project_dir.join(expand_home(raw));

        let arduino_root = path(
            section
                .arduino_root
                .as_deref()
                .unwrap_or(DEFAULT_ARDUINO_ROOT),
        );

        let arduino_ver = match section.arduino_ver.as_deref() {
            Some(version) if !version.trim().is_empty() => parse_arduino_version(version)?,
            _ => read_arduino_version(&arduino_root)?,
        };

        let compile_root = section
            .compile_root
            .as_deref()
            .map_or_else(|| dirs.compile_root(), path);

        let library_dirs = section
            .library_dirs
            .iter()
            .flatten()
            .map(|dir| path(dir))
            .collect();

        let settings = Self {
            arduino_root,
            arduino_ver,
            compile_root,
            library_dirs,
            recipe_dir: section.recipe_dir.as_deref().map(path),
            catalog: section.catalog.as_deref().map(path),
        };
        tracing::debug!("Resolved settings: {settings:?}");
        Ok(settings)
    }

    /// AVR hardware directory of the Arduino installation
    pub fn hardware_dir(&self) -> PathBuf {
        board::hardware_dir(&self.arduino_root, self.arduino_ver)
    }

    /// Read `boards.txt`
    pub fn load_boards(&self) -> Result<Boards, ConfigError> {
        Boards::load(&board::boards_path(&self.arduino_root, self.arduino_ver))
    }

    /// Builtin catalog plus the configured overlay
    pub fn load_catalog(&self) -> Result<DependencyCatalog, ConfigError> {
        DependencyCatalog::load_with_overlay(self.catalog.as_deref())
    }
}

/// Turn "1.0.5" into 105
pub fn parse_arduino_version(version: &str) -> Result<u32, ConfigError> {
    let digits: String = version.trim().chars().filter(|c| *c != '.').collect();
    digits.parse().map_err(|_| ConfigError::InvalidVersion {
        version: version.trim().to_string(),
    })
}

/// Read the version from `<arduino_root>/lib/version.txt`
pub fn read_arduino_version(arduino_root: &Path) -> Result<u32, ConfigError> {
    let path = arduino_root.join("lib").join("version.txt");
    if !path.is_file() {
        return Err(ConfigError::VersionNotFound { path });
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        error: e.to_string(),
    })?;
    parse_arduino_version(&content)
}
