//! Library dependency catalog
//!
//! Maps each library to the set of libraries it directly depends on.
//! The catalog shipped with xuino lives in `catalog/dependencies.json`;
//! users may overlay their own JSON file of the same shape.
//!
//! Library names are the case-sensitive directory names from the Arduino
//! `libraries/` folder. The math library is called `m`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Catalog compiled into the binary
const BUILTIN_CATALOG: &str = include_str!("../../catalog/dependencies.json");
const BUILTIN_CATALOG_PATH: &str = "catalog/dependencies.json";

/// Immutable mapping: library -> direct dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyCatalog {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog bundled with xuino
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::bundled(BUILTIN_CATALOG)
    }

    fn bundled(content: &str) -> Result<Self, ConfigError> {
        Self::from_json(content).map_err(|e| ConfigError::Catalog {
            path: PathBuf::from(BUILTIN_CATALOG_PATH),
            error: e.to_string(),
        })
    }

    /// Parse a catalog from a JSON object of string arrays
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(content)?;
        let entries = raw
            .into_iter()
            .map(|(lib, deps)| (lib, deps.into_iter().collect()))
            .collect();
        Ok(Self { entries })
    }

    /// Load a catalog file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Catalog {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| ConfigError::Catalog {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load the builtin catalog, overlaid with a user catalog if one is given
    ///
    /// Entries from the user catalog replace builtin entries of the same name.
    pub fn load_with_overlay(overlay: Option<&Path>) -> Result<Self, ConfigError> {
        let mut catalog = Self::builtin()?;
        if let Some(path) = overlay {
            tracing::debug!("Loading dependency catalog overlay {}", path.display());
            catalog.merge(Self::load(path)?);
        }
        Ok(catalog)
    }

    /// Add or replace an entry
    #[must_use]
    pub fn with_entry<I, S>(mut self, library: &str, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.insert(
            library.to_string(),
            dependencies.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Merge another catalog into this one, replacing clashing entries
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    /// Direct dependencies of a library, if it is catalogued
    pub fn dependencies(&self, library: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(library)
    }

    /// Number of catalogued libraries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_catalog_parses() {
        assert!(DependencyCatalog::from_json(BUILTIN_CATALOG).is_ok());

        let catalog = DependencyCatalog::builtin().unwrap();
        let ethernet = catalog.dependencies("Ethernet").unwrap();
        assert!(ethernet.contains("SPI"));
        assert!(ethernet.contains("m"));
    }

    #[test]
    fn test_duplicate_dependencies_collapse_into_set() {
        let catalog = DependencyCatalog::from_json(r#"{"Wire": ["core", "core", "m"]}"#).unwrap();
        assert_eq!(catalog.dependencies("Wire").unwrap().len(), 2);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let catalog = DependencyCatalog::builtin().unwrap();
        assert!(catalog.dependencies("ethernet").is_none());
    }

    #[test]
    fn test_broken_bundled_catalog_is_an_error() {
        let err = DependencyCatalog::bundled(r#"{"Ethernet": "SPI"}"#).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Catalog { ref path, .. } if path == Path::new("catalog/dependencies.json")
        ));
    }

    #[test]
    fn test_overlay_replaces_builtin_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deps.json");
        std::fs::write(&path, r#"{"Ethernet": ["SPI"], "SD": ["SPI"]}"#).unwrap();

        let catalog = DependencyCatalog::load_with_overlay(Some(&path)).unwrap();
        assert_eq!(catalog.dependencies("Ethernet").unwrap().len(), 1);
        assert!(catalog.dependencies("SD").unwrap().contains("SPI"));
    }

    #[test]
    fn test_invalid_catalog_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("deps.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            DependencyCatalog::load(&path),
            Err(ConfigError::Catalog { .. })
        ));
    }
}
