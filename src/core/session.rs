//! Command session
//!
//! Loads settings once for a project directory and wires the resolver,
//! source locator and build orchestrator together for the CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::board::{BoardInfo, Boards};
use crate::core::build_env::ProjectEnvironment;
use crate::core::builder::{BuildOrchestrator, BuildReport};
use crate::core::catalog::DependencyCatalog;
use crate::core::config::Settings;
use crate::core::resolver::DependencyResolver;
use crate::core::sources::SourceLocator;
use crate::error::XuinoError;
use crate::infra::make::MakeRunner;
use crate::infra::sources::ArduinoSourceLocator;

/// Everything one command needs
#[derive(Debug, Clone)]
pub struct Session {
    /// Resolved settings
    pub settings: Settings,
    locator: ArduinoSourceLocator,
}

impl Session {
    /// Load settings for `project_dir`
    pub fn load(project_dir: &Path) -> Result<Self, XuinoError> {
        Ok(Self::new(Settings::load(project_dir)?))
    }

    /// Create a session from already resolved settings
    pub fn new(settings: Settings) -> Self {
        let locator = ArduinoSourceLocator::new(&settings);
        Self { settings, locator }
    }

    /// All boards of the installation
    pub fn boards(&self) -> Result<Boards, XuinoError> {
        Ok(self.settings.load_boards()?)
    }

    /// One board
    pub fn board(&self, id: &str) -> Result<BoardInfo, XuinoError> {
        Ok(self.boards()?.get(id)?.clone())
    }

    /// Dependency catalog with the configured overlay
    pub fn catalog(&self) -> Result<DependencyCatalog, XuinoError> {
        Ok(self.settings.load_catalog()?)
    }

    /// Requested libraries plus dependencies, in build order
    pub fn resolve(&self, requested: &[String]) -> Result<Vec<String>, XuinoError> {
        let catalog = self.catalog()?;
        let order = DependencyResolver::new(&catalog).resolve(requested)?;
        tracing::info!("Resolved {} libraries: {}", order.len(), order.join(" "));
        Ok(order)
    }

    /// Source directories of `libraries`, in order
    pub fn source_dirs(&self, libraries: &[String], variant: &str) -> Result<Vec<PathBuf>, XuinoError> {
        Ok(self.locator.locate_all(libraries, variant)?)
    }

    /// Object file names of one library
    pub fn object_files(&self, library: &str, variant: &str) -> Result<Vec<String>, XuinoError> {
        Ok(self.locator.object_files(library, variant)?)
    }

    /// Compile resolved `libraries` for `board` with `make`
    pub async fn build_libraries(
        &self,
        libraries: &[String],
        board: &BoardInfo,
    ) -> Result<BuildReport, XuinoError> {
        let runner = MakeRunner::from_path()?;
        tracing::debug!("Using build tool {}", runner.program().display());
        let orchestrator = BuildOrchestrator::new(
            &self.settings,
            Arc::new(self.locator.clone()),
            Arc::new(runner),
        );
        Ok(orchestrator.build(libraries, board).await?)
    }

    /// Environment for the project `make` once its libraries are built
    pub fn project_environment(
        &self,
        board: &BoardInfo,
        libraries: &[String],
        lib_dirs: Vec<PathBuf>,
    ) -> Result<ProjectEnvironment, XuinoError> {
        let variant = board.variant()?;
        Ok(ProjectEnvironment::new(
            board.cflags(self.settings.arduino_ver)?,
            self.source_dirs(libraries, variant)?,
            lib_dirs,
        ))
    }
}
