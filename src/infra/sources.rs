//! Filesystem source lookup
//!
//! Searches the Arduino installation and the configured library directories.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::core::config::Settings;
use crate::core::resolver::{CORE_LIBRARY, MATH_LIBRARY};
use crate::core::sources::{object_name, SourceLocator};
use crate::error::SourceError;

/// Optional per-library subdirectory that is compiled too
const UTILITY_SUBDIR: &str = "utility";

/// Locates sources in an Arduino installation
#[derive(Debug, Clone)]
pub struct ArduinoSourceLocator {
    arduino_root: PathBuf,
    hardware_dir: PathBuf,
    library_dirs: Vec<PathBuf>,
}

impl ArduinoSourceLocator {
    /// Create a locator from settings
    pub fn new(settings: &Settings) -> Self {
        Self {
            arduino_root: settings.arduino_root.clone(),
            hardware_dir: settings.hardware_dir(),
            library_dirs: settings.library_dirs.clone(),
        }
    }

    /// `cores/arduino/*/`, then `cores/arduino`, then `variants/<variant>`
    fn core_dirs(&self, variant: &str) -> Vec<PathBuf> {
        let core = self.hardware_dir.join("cores").join("arduino");
        let mut dirs = subdirectories(&core);
        dirs.push(core);
        dirs.push(self.hardware_dir.join("variants").join(variant));
        dirs
    }

    /// First existing library directory: user dirs in order, then the installation
    fn library_dir(&self, library: &str) -> Option<PathBuf> {
        self.library_dirs
            .iter()
            .map(|dir| dir.join(library))
            .chain(std::iter::once(self.arduino_root.join("libraries").join(library)))
            .find(|candidate| candidate.is_dir())
    }
}

impl SourceLocator for ArduinoSourceLocator {
    fn locate(&self, library: &str, variant: &str) -> Result<Vec<PathBuf>, SourceError> {
        if library == CORE_LIBRARY {
            return Ok(self.core_dirs(variant));
        }
        if library == MATH_LIBRARY {
            return Ok(Vec::new());
        }

        let main = self
            .library_dir(library)
            .ok_or_else(|| SourceError::LibraryNotFound {
                name: library.to_string(),
            })?;
        tracing::debug!("Found library {library} at {}", main.display());

        let utility = main.join(UTILITY_SUBDIR);
        let mut dirs = vec![main];
        if utility.exists() {
            dirs.push(utility);
        }
        Ok(dirs)
    }

    fn object_files(&self, library: &str, variant: &str) -> Result<Vec<String>, SourceError> {
        Ok(objects_in(&self.locate(library, variant)?))
    }
}

/// Immediate subdirectories, sorted by name
fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Object file names for every C, C++ and sketch source in `dirs`
///
/// Only the top level of each directory is searched.
pub fn objects_in(dirs: &[PathBuf]) -> Vec<String> {
    dirs.iter()
        .flat_map(|dir| {
            WalkDir::new(dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .filter_map(|entry| object_name(entry.path()))
        })
        .collect()
}
