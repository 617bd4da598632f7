//! Build orchestration logic
//!
//! Compiles every library of a resolved build set with one external job per
//! library. All jobs are dispatched before any is awaited, then joined in
//! build order. A failing job never cancels the others: the whole set runs to
//! completion and every log is reported.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::Instrument;

use crate::core::board::BoardInfo;
use crate::core::build_env::{BuildEnvironment, SharedContext};
use crate::core::config::Settings;
use crate::core::recipes::RecipeBook;
use crate::core::resolver::MATH_LIBRARY;
use crate::core::sources::SourceLocator;
use crate::error::{BuildError, LibraryOutput};
use crate::infra::filesystem;

/// One external compilation of one library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildJob {
    /// Library being compiled
    pub library: String,
    /// Compile-cache directory the job runs in
    pub work_dir: PathBuf,
    /// Makefile to run
    pub recipe: PathBuf,
    /// Complete process environment
    pub env: BTreeMap<String, String>,
}

/// What a finished job produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOutput {
    /// Exit code, `None` when killed by a signal
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl JobOutput {
    /// Whether the job exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs build jobs
#[async_trait]
pub trait BuildRunner: Send + Sync {
    /// Run one job to completion and capture its output
    async fn run(&self, job: &BuildJob) -> Result<JobOutput, BuildError>;
}

/// Result of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Compile-cache directory of every library, in build order
    pub artifacts: Vec<PathBuf>,
    /// stdout of every dispatched job, in build order
    pub outputs: Vec<LibraryOutput>,
}

/// Build orchestrator
pub struct BuildOrchestrator {
    compile_root: PathBuf,
    arduino_ver: u32,
    locator: Arc<dyn SourceLocator>,
    recipes: RecipeBook,
    runner: Arc<dyn BuildRunner>,
}

impl BuildOrchestrator {
    /// Create a new build orchestrator
    pub fn new(
        settings: &Settings,
        locator: Arc<dyn SourceLocator>,
        runner: Arc<dyn BuildRunner>,
    ) -> Self {
        Self {
            compile_root: settings.compile_root.clone(),
            arduino_ver: settings.arduino_ver,
            locator,
            recipes: RecipeBook::from_settings(settings),
            runner,
        }
    }

    /// `<compile_root>/<board>/<library>`
    pub fn compile_dir(&self, board: &str, library: &str) -> PathBuf {
        self.compile_root.join(board).join(library)
    }

    /// Flags, board id and the source directories of every library
    pub fn shared_context(
        &self,
        libraries: &[String],
        board: &BoardInfo,
    ) -> Result<SharedContext, BuildError> {
        let variant = board.variant()?;
        Ok(SharedContext {
            board: board.id.clone(),
            cflags: board.cflags(self.arduino_ver)?,
            src_dirs: Arc::new(self.locator.locate_all(libraries, variant)?),
        })
    }

    /// One job per library except the math library
    ///
    /// Creates each compile directory. Fails before anything is dispatched
    /// if a library cannot be located.
    pub fn prepare_jobs(
        &self,
        libraries: &[String],
        board: &BoardInfo,
    ) -> Result<Vec<BuildJob>, BuildError> {
        let context = self.shared_context(libraries, board)?;
        let variant = board.variant()?;
        self.recipes.prepare()?;

        let mut jobs = Vec::with_capacity(libraries.len());
        for library in libraries.iter().filter(|lib| lib.as_str() != MATH_LIBRARY) {
            let objects = self.locator.object_files(library, variant)?;
            let env = BuildEnvironment::for_library(&context, library, objects);
            env.validate()?;

            let work_dir = self.compile_dir(&board.id, library);
            filesystem::create_dir_all(&work_dir)?;

            let recipe = self.recipes.select(library);
            tracing::debug!(
                "Prepared {library}: recipe {} (specialised: {})",
                recipe.path.display(),
                recipe.specialised
            );

            jobs.push(BuildJob {
                library: library.clone(),
                work_dir,
                recipe: recipe.path,
                env: env.to_env_map(),
            });
        }
        Ok(jobs)
    }

    /// Compile `libraries` (already resolved and ordered) for `board`
    pub async fn build(
        &self,
        libraries: &[String],
        board: &BoardInfo,
    ) -> Result<BuildReport, BuildError> {
        let jobs = self.prepare_jobs(libraries, board)?;
        tracing::info!("Building {} libraries for {}", jobs.len(), board.id);

        let outcomes = run_all(&self.runner, jobs).await;

        let mut failed = Vec::new();
        let mut outputs = Vec::with_capacity(outcomes.len());
        for (library, outcome) in outcomes {
            let ok = outcome.success();
            let JobOutput {
                exit_code,
                stdout: mut output,
                stderr,
            } = outcome;
            if !ok {
                tracing::warn!("Library {library} failed with exit code {exit_code:?}");
                output.push_str(&stderr);
                failed.push(library.clone());
            }
            outputs.push(LibraryOutput { library, output });
        }

        if !failed.is_empty() {
            return Err(BuildError::BuildFailure { failed, outputs });
        }

        Ok(BuildReport {
            artifacts: libraries
                .iter()
                .map(|library| self.compile_dir(&board.id, library))
                .collect(),
            outputs,
        })
    }
}

/// Dispatch every job, then join them in dispatch order
///
/// A runner error or a panicked task counts as a failed job whose stderr is
/// the error text.
async fn run_all(runner: &Arc<dyn BuildRunner>, jobs: Vec<BuildJob>) -> Vec<(String, JobOutput)> {
    let (libraries, handles): (Vec<_>, Vec<_>) = jobs
        .into_iter()
        .map(|job| {
            let runner = Arc::clone(runner);
            let library = job.library.clone();
            let span = tracing::info_span!("build", library = %job.library);
            let handle = tokio::spawn(
                async move {
                    tracing::debug!("Dispatching {} in {}", job.library, job.work_dir.display());
                    runner.run(&job).await
                }
                .instrument(span),
            );
            (library, handle)
        })
        .unzip();

    let joined = futures::future::join_all(handles).await;

    libraries
        .into_iter()
        .zip(joined)
        .map(|(library, result)| {
            let outcome = match result {
                Ok(Ok(output)) => output,
                Ok(Err(e)) => failed_output(e.to_string()),
                Err(e) => failed_output(e.to_string()),
            };
            (library, outcome)
        })
        .collect()
}

fn failed_output(stderr: String) -> JobOutput {
    JobOutput {
        exit_code: None,
        stdout: String::new(),
        stderr,
    }
}
