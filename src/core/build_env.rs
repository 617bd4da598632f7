//! Build environment setup
//!
//! Provides the variables handed to `make` when compiling a library
//! (`LIBRARY`, `BOARD`, `BOARD_C_FLAGS`, `SRC_DIRS`, `INCLUDES`, `LIBOBJS`)
//! and when building the user's project.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::sources::{include_flags, join_dirs, link_dir_flags, link_name_flags};

/// Context shared read-only by every library job of one build
///
/// Every job sees the source directories of every requested library, not
/// just its own, so headers of dependencies are always on the include path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedContext {
    /// Board short name
    pub board: String,
    /// Compiler flags for the board
    pub cflags: String,
    /// Source directories of all requested libraries
    pub src_dirs: Arc<Vec<PathBuf>>,
}

/// Build environment for one library.
///
/// The job runs with a cleared environment, so `PATH` is passed through
/// explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildEnvironment {
    /// Library being built
    pub library: String,
    /// Board short name
    pub board: String,
    /// Board compiler flags (`-mmcu=... -DF_CPU=... -DARDUINO=...`)
    pub board_c_flags: String,
    /// Source directories shared across all jobs
    pub src_dirs: Arc<Vec<PathBuf>>,
    /// Object files this library compiles to
    pub lib_objs: Vec<String>,
    /// Search path for the build tool
    pub path: Option<String>,
}

impl BuildEnvironment {
    /// Create the environment for one library from the shared context
    pub fn for_library(context: &SharedContext, library: &str, lib_objs: Vec<String>) -> Self {
        Self {
            library: library.to_string(),
            board: context.board.clone(),
            board_c_flags: context.cflags.clone(),
            src_dirs: Arc::clone(&context.src_dirs),
            lib_objs,
            path: std::env::var("PATH").ok(),
        }
    }

    /// `-I` flags for the shared source directories
    pub fn includes(&self) -> String {
        include_flags(&self.src_dirs)
    }

    /// Convert to environment variable map for process execution
    pub fn to_env_map(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();

        env.insert("LIBRARY".to_string(), self.library.clone());
        env.insert("BOARD".to_string(), self.board.clone());
        env.insert("BOARD_C_FLAGS".to_string(), self.board_c_flags.clone());
        env.insert("SRC_DIRS".to_string(), join_dirs(&self.src_dirs));
        env.insert("INCLUDES".to_string(), self.includes());
        env.insert("LIBOBJS".to_string(), self.lib_objs.join(" "));

        if let Some(ref path) = self.path {
            env.insert("PATH".to_string(), path.clone());
        }

        env
    }

    /// Check that the variables every recipe relies on are set
    pub fn validate(&self) -> Result<(), BuildEnvError> {
        if self.library.is_empty() {
            return Err(BuildEnvError::MissingVariable("LIBRARY".to_string()));
        }
        if self.board.is_empty() {
            return Err(BuildEnvError::MissingVariable("BOARD".to_string()));
        }
        if self.board_c_flags.is_empty() {
            return Err(BuildEnvError::MissingVariable("BOARD_C_FLAGS".to_string()));
        }
        if self.library.contains(char::is_whitespace) {
            return Err(BuildEnvError::InvalidValue {
                variable: "LIBRARY".to_string(),
                reason: "must not contain whitespace".to_string(),
            });
        }
        Ok(())
    }
}

/// Environment for the final `make` of the user's project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEnvironment {
    /// Board compiler flags
    pub board_c_flags: String,
    /// Source directories of all libraries
    pub src_dirs: Vec<PathBuf>,
    /// Compiled library directories, in link order
    pub lib_dirs: Vec<PathBuf>,
    /// Search path for the build tool
    pub path: Option<String>,
}

impl ProjectEnvironment {
    /// Create the project environment
    pub fn new(board_c_flags: String, src_dirs: Vec<PathBuf>, lib_dirs: Vec<PathBuf>) -> Self {
        Self {
            board_c_flags,
            src_dirs,
            lib_dirs,
            path: std::env::var("PATH").ok(),
        }
    }

    /// `-L <dir> ... -l<name> ...` for the compiled libraries
    pub fn lib_includes(&self) -> String {
        format!(
            "{} {}",
            link_dir_flags(&self.lib_dirs),
            link_name_flags(&self.lib_dirs)
        )
    }

    /// Convert to environment variable map for process execution
    pub fn to_env_map(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        env.insert("BOARD_C_FLAGS".to_string(), self.board_c_flags.clone());
        env.insert("SRC_DIRS".to_string(), join_dirs(&self.src_dirs));
        env.insert("HEADER_INCLUDES".to_string(), include_flags(&self.src_dirs));
        env.insert("LIB_INCLUDES".to_string(), self.lib_includes());
        if let Some(ref path) = self.path {
            env.insert("PATH".to_string(), path.clone());
        }
        env
    }
}

/// Build environment errors
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEnvError {
    /// Required variable is missing
    MissingVariable(String),
    /// Variable has invalid value
    InvalidValue { variable: String, reason: String },
}

impl std::fmt::Display for BuildEnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVariable(var) => write!(f, "Missing required environment variable: {var}"),
            Self::InvalidValue { variable, reason } => {
                write!(f, "Invalid value for {variable}: {reason}")
            }
        }
    }
}

impl std::error::Error for BuildEnvError {}
