//! CLI implementation for `xuino init` command
//!
//! Creates a project Makefile from the embedded template.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::commands::load_session;
use crate::cli::output::OutputConfig;
use crate::core::project::init_project;

/// Execute the init command
pub async fn execute(
    current_dir: &Path,
    dir: &Path,
    name: &str,
    board: &str,
    libraries: &[String],
    output: &OutputConfig,
) -> Result<()> {
    let project_dir = current_dir.join(dir);
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Project name must not be empty");
    }

    // The board must exist, though it can be changed in the Makefile later
    let session = load_session(current_dir)?;
    session.board(board)?;

    let makefile = init_project(&project_dir, name, board, libraries)
        .with_context(|| format!("Failed to create project in {}", project_dir.display()))?;
    tracing::info!("Wrote {}", makefile.display());

    output.status("Successfully created a new makefile.");
    Ok(())
}
