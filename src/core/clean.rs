//! Clean logic
//!
//! Removes the cache of compiled library code, which is everything under the
//! compile root.

use std::path::Path;

use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Result of clean operation
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanResult {
    /// Whether there was a cache to remove
    pub removed: bool,
    /// Board directories that were cached
    pub boards: Vec<String>,
}

/// Remove the compile root and everything in it
pub fn clean_compile_root(compile_root: &Path) -> Result<CleanResult, FilesystemError> {
    if !compile_root.exists() {
        return Ok(CleanResult::default());
    }

    let mut boards: Vec<String> = std::fs::read_dir(compile_root)
        .map_err(|e| FilesystemError::ReadFile {
            path: compile_root.to_path_buf(),
            error: e.to_string(),
        })?
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name != "recipes")
        .collect();
    boards.sort();

    filesystem::remove_dir_all(compile_root)?;
    tracing::info!("Removed {}", compile_root.display());

    Ok(CleanResult {
        removed: true,
        boards,
    })
}
