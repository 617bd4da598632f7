//! CLI implementation for `xuino clean` command
//!
//! Removes the cache of compiled library code.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::commands::load_session;
use crate::cli::output::OutputConfig;
use crate::core::clean::clean_compile_root;

/// Execute the clean command
pub async fn execute(current_dir: &Path, output: &OutputConfig) -> Result<()> {
    let session = load_session(current_dir)?;
    let compile_root = &session.settings.compile_root;

    let result = clean_compile_root(compile_root)
        .with_context(|| format!("Failed to clean {}", compile_root.display()))?;

    if !result.removed {
        output.status("Nothing to clean");
    } else if result.boards.is_empty() {
        output.status(&format!("Removed {}", compile_root.display()));
    } else {
        output.status(&format!(
            "Removed compiled libraries for: {}",
            result.boards.join(", ")
        ));
    }
    Ok(())
}
