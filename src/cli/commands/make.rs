//! CLI implementation for `xuino make` command
//!
//! Compiles the project's libraries up front, then runs the project's own
//! Makefile with every xuino variable already filled in.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::commands::load_session;
use crate::cli::output::OutputConfig;
use crate::core::project::{project_variables, ProjectVariables};
use crate::infra::make::MakeRunner;

/// Execute the make command
pub async fn execute(current_dir: &Path, output: &OutputConfig) -> Result<()> {
    // BOARD and LIBRARIES from the shell take precedence over the Makefile
    let overrides = ProjectVariables {
        board: std::env::var("BOARD").ok(),
        libraries: std::env::var("LIBRARIES").ok(),
    };
    let (board, requested) = project_variables(current_dir, overrides)?;

    let session = load_session(current_dir)?;
    let board_info = session.board(&board)?;
    let libraries = session.resolve(&requested)?;

    let spinner = output.spinner("Making libraries...");
    let result = session.build_libraries(&libraries, &board_info).await;
    spinner.finish_and_clear();
    let report = result.context("Fatal error, unable to compile all libraries")?;

    output.build_logs(&report.outputs);

    let env = session
        .project_environment(&board_info, &libraries, report.artifacts)?
        .to_env_map();
    let runner = MakeRunner::from_path()?;
    let code = runner
        .run_project(current_dir, &env)
        .await
        .context("Failed to run make for the project")?;

    if code != Some(0) {
        anyhow::bail!("Oh no! Make failed (exit code {code:?})");
    }
    output.status("Success!");
    Ok(())
}
