//! External build tool invocation
//!
//! Runs `make` for library jobs and for the user's project. Library jobs get
//! a cleared environment holding only the variables of their [`BuildJob`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::defaults::BUILD_TOOL;
use crate::core::builder::{BuildJob, BuildRunner, JobOutput};
use crate::error::BuildError;

/// Runs build jobs through `make -f <recipe>`
#[derive(Debug, Clone)]
pub struct MakeRunner {
    program: PathBuf,
}

impl MakeRunner {
    /// Create a runner for an explicit build tool binary
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    /// Locate `make` in PATH
    pub fn from_path() -> Result<Self, BuildError> {
        Ok(Self::new(ensure_build_tool()?))
    }

    /// Build tool binary
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run `make` in the project directory, inheriting stdio
    ///
    /// The environment is replaced by `env`. Returns the exit code.
    pub async fn run_project(
        &self,
        project_dir: &Path,
        env: &BTreeMap<String, String>,
    ) -> Result<Option<i32>, BuildError> {
        tracing::info!("Running {} in {}", self.program.display(), project_dir.display());
        let status = Command::new(&self.program)
            .current_dir(project_dir)
            .env_clear()
            .envs(env)
            .status()
            .await
            .map_err(|e| BuildError::Spawn {
                tool: BUILD_TOOL.to_string(),
                library: "project".to_string(),
                error: e.to_string(),
            })?;
        Ok(status.code())
    }
}

#[async_trait]
impl BuildRunner for MakeRunner {
    async fn run(&self, job: &BuildJob) -> Result<JobOutput, BuildError> {
        let output = Command::new(&self.program)
            .arg("-f")
            .arg(&job.recipe)
            .current_dir(&job.work_dir)
            .env_clear()
            .envs(&job.env)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| BuildError::Spawn {
                tool: BUILD_TOOL.to_string(),
                library: job.library.clone(),
                error: e.to_string(),
            })?;

        let result = JobOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!("{} exited with {:?}", job.library, result.exit_code);
        Ok(result)
    }
}

/// Path of the build tool, or `ToolNotFound`
pub fn ensure_build_tool() -> Result<PathBuf, BuildError> {
    which::which(BUILD_TOOL).map_err(|_| BuildError::ToolNotFound {
        tool: BUILD_TOOL.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn job(temp: &TempDir, recipe: &str) -> BuildJob {
        let recipe_path = temp.path().join("Test.mk");
        std::fs::write(&recipe_path, recipe).unwrap();
        let mut env = BTreeMap::new();
        env.insert("LIBRARY".to_string(), "SPI".to_string());
        if let Ok(path) = std::env::var("PATH") {
            env.insert("PATH".to_string(), path);
        }
        BuildJob {
            library: "SPI".to_string(),
            work_dir: temp.path().to_path_buf(),
            recipe: recipe_path,
            env,
        }
    }

    #[tokio::test]
    async fn test_make_runs_recipe_with_job_environment() {
        let Ok(runner) = MakeRunner::from_path() else {
            return;
        };
        let temp = TempDir::new().unwrap();
        let job = job(&temp, "all:\n\t@echo building $(LIBRARY) $(HOME)\n");

        let output = runner.run(&job).await.unwrap();

        assert!(output.success());
        // HOME is not passed through the cleared environment
        assert_eq!(output.stdout.trim(), "building SPI");
    }

    #[tokio::test]
    async fn test_failing_recipe_captures_stderr() {
        let Ok(runner) = MakeRunner::from_path() else {
            return;
        };
        let temp = TempDir::new().unwrap();
        let job = job(&temp, "all:\n\t@echo broken >&2; exit 3\n");

        let output = runner.run(&job).await.unwrap();

        assert!(!output.success());
        assert!(output.stderr.contains("broken"));
    }

    #[test]
    fn test_ensure_build_tool_matches_which() {
        match (ensure_build_tool(), which::which(BUILD_TOOL)) {
            (Ok(found), Ok(expected)) => assert_eq!(found, expected),
            (Err(err), Err(_)) => assert!(matches!(err, BuildError::ToolNotFound { .. })),
            (found, expected) => panic!("mismatch: {found:?} vs {expected:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let temp = TempDir::new().unwrap();
        let runner = MakeRunner::new(temp.path().join("no-such-make"));
        let job = job(&temp, "all:\n");

        let err = runner.run(&job).await.unwrap_err();

        assert!(matches!(err, BuildError::Spawn { .. }));
    }
}
