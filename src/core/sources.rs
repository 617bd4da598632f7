//! Library source lookup
//!
//! Maps library names to the directories holding their source code, and
//! renders those directories as compiler flags.

use std::path::{Path, PathBuf};

use crate::error::SourceError;

/// Finds the source directories of a library
pub trait SourceLocator: Send + Sync {
    /// Source directories for one library
    ///
    /// `variant` selects the board's pin layout and only matters for `core`.
    /// The math library has no sources and yields an empty list.
    fn locate(&self, library: &str, variant: &str) -> Result<Vec<PathBuf>, SourceError>;

    /// Object file names the library compiles to
    fn object_files(&self, library: &str, variant: &str) -> Result<Vec<String>, SourceError>;

    /// Source directories for several libraries, concatenated in order
    fn locate_all(&self, libraries: &[String], variant: &str) -> Result<Vec<PathBuf>, SourceError> {
        let mut dirs = Vec::new();
        for library in libraries {
            dirs.extend(self.locate(library, variant)?);
        }
        Ok(dirs)
    }
}

/// Space separated directory list
pub fn join_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `-I <dir>` for every directory
pub fn include_flags(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| format!("-I {}", d.display()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `-L <dir>` for every directory
pub fn link_dir_flags(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| format!("-L {}", d.display()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `-l<name>` for every directory, named after its lowercased last component
///
/// `/cache/uno/Ethernet` links as `-lethernet`.
pub fn link_name_flags(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .filter_map(|d| d.file_name())
        .map(|name| format!("-l{}", name.to_string_lossy().to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Object file name for a source file, if it is one we compile
pub fn object_name(source: &Path) -> Option<String> {
    let extension = source.extension()?.to_str()?;
    if !matches!(extension, "c" | "cpp" | "ino") {
        return None;
    }
    let stem = source.file_stem()?.to_str()?;
    Some(format!("{stem}.o"))
}
