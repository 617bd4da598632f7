//! Error types for xuino
//!
//! Domain-specific error types using thiserror.

use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
///
/// Anything wrong with the inputs the core cannot proceed without:
/// config files, the Arduino version, `boards.txt` or the dependency catalog.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: PathBuf, error: String },

    /// Failed to parse a config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: PathBuf, error: String },

    /// version.txt is missing and no version was configured
    #[error(
        "Unable to find version.txt at '{path}'. \
         Please explicitly specify arduino_ver in the global config or .xuino.toml"
    )]
    VersionNotFound { path: PathBuf },

    /// The Arduino version could not be parsed
    #[error(
        "Unable to parse Arduino version '{version}'. \
         Please explicitly specify arduino_ver in the global config or .xuino.toml"
    )]
    InvalidVersion { version: String },

    /// boards.txt could not be read
    #[error("Failed to read boards file '{path}': {error}")]
    BoardsUnreadable { path: PathBuf, error: String },

    /// Malformed line in boards.txt
    #[error("Malformed line {line} in boards file: '{content}'")]
    MalformedBoardLine { line: usize, content: String },

    /// Board not present in boards.txt
    #[error("Board not found '{name}'. Run 'xuino list' for a list of boards")]
    BoardNotFound { name: String },

    /// Board lacks a property the build needs
    #[error("Board '{board}' is missing property '{property}'")]
    MissingProperty { board: String, property: String },

    /// Dependency catalog could not be loaded
    #[error("Failed to load dependency catalog '{path}': {error}")]
    Catalog { path: PathBuf, error: String },
}

/// Dependency resolution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// The requested libraries form a dependency cycle
    #[error("Cyclic dependencies between: {}", remaining.join(", "))]
    CyclicDependency { remaining: Vec<String> },
}

/// Source location errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// No search root holds a directory for the library
    #[error("No library found with name '{name}'")]
    LibraryNotFound { name: String },
}

/// Captured output of one library's build job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryOutput {
    /// Library name
    pub library: String,
    /// stdout, followed by stderr when the job failed
    pub output: String,
}

/// Render build logs the way they are shown to the user
pub fn format_build_logs(outputs: &[LibraryOutput]) -> String {
    let mut rendered = String::new();
    for entry in outputs {
        let _ = writeln!(rendered, "-- Output from {} make command --", entry.library);
        let _ = writeln!(rendered, "{}", entry.output);
    }
    rendered
}

/// Build errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// One or more library jobs exited non-zero
    #[error("Unable to compile all libraries (failed: {})", failed.join(", "))]
    BuildFailure {
        /// Libraries whose job failed, in build order
        failed: Vec<String>,
        /// Output of every dispatched job, in build order
        outputs: Vec<LibraryOutput>,
    },

    /// The external build tool is not installed
    #[error("Build tool '{tool}' not found in PATH")]
    ToolNotFound { tool: String },

    /// The external build tool could not be started
    #[error("Failed to run '{tool}' for library '{library}': {error}")]
    Spawn {
        tool: String,
        library: String,
        error: String,
    },

    /// Locating sources for the shared context failed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The board lacks the properties needed for compiler flags
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A job environment is incomplete
    #[error(transparent)]
    Environment(#[from] crate::core::build_env::BuildEnvError),

    /// Compile directory or recipe could not be prepared
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

impl BuildError {
    /// Full diagnostic dump for a failed build, empty for other errors
    pub fn logs(&self) -> String {
        match self {
            Self::BuildFailure { outputs, .. } => format_build_logs(outputs),
            _ => String::new(),
        }
    }
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Project makefile errors
#[derive(Error, Debug)]
pub enum ProjectError {
    /// `xuino make` needs a Makefile
    #[error("No Makefile in '{path}'. Run 'xuino init' to get one")]
    MakefileMissing { path: PathBuf },

    /// `xuino init` never overwrites a Makefile
    #[error("{path} exists!")]
    MakefileExists { path: PathBuf },

    /// BOARD or LIBRARIES is set neither in the environment nor the Makefile
    #[error("Unable to extract {variable} from '{path}'")]
    VariableMissing { variable: String, path: PathBuf },

    /// The project makefile could not be read or written
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// Top-level xuino error type
#[derive(Error, Debug)]
pub enum XuinoError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resolver error
    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),

    /// Source location error
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Build error
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Project error
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyclic_dependency_names_remaining_nodes() {
        let err = ResolverError::CyclicDependency {
            remaining: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(err.to_string(), "Cyclic dependencies between: A, B");
    }

    #[test]
    fn test_build_failure_logs_include_every_library() {
        let err = BuildError::BuildFailure {
            failed: vec!["SPI".to_string()],
            outputs: vec![
                LibraryOutput {
                    library: "core".to_string(),
                    output: "ok".to_string(),
                },
                LibraryOutput {
                    library: "SPI".to_string(),
                    output: "boom".to_string(),
                },
            ],
        };

        let logs = err.logs();
        assert!(logs.contains("-- Output from core make command --\nok"));
        assert!(logs.contains("-- Output from SPI make command --\nboom"));
        assert!(err.to_string().contains("SPI"));
    }

    #[test]
    fn test_non_failure_errors_have_no_logs() {
        let err = BuildError::ToolNotFound {
            tool: "make".to_string(),
        };
        assert!(err.logs().is_empty());
    }
}
