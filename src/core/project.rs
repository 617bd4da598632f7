//! Project makefile handling
//!
//! A project is a directory with a `Makefile` created from the embedded
//! template. `xuino make` reads `BOARD` and `LIBRARIES` back out of it.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::defaults::PROJECT_MAKEFILE;
use crate::core::recipes::render_project_makefile;
use crate::error::ProjectError;
use crate::infra::filesystem;

/// Board and libraries a project is built with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectVariables {
    /// Board short name
    pub board: Option<String>,
    /// Space separated library names
    pub libraries: Option<String>,
}

impl ProjectVariables {
    /// Values set in `self` win over those in `fallback`
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            board: self.board.or(fallback.board),
            libraries: self.libraries.or(fallback.libraries),
        }
    }

    /// Both variables are known
    pub fn is_complete(&self) -> bool {
        self.board.is_some() && self.libraries.is_some()
    }
}

fn board_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^BOARD\s*=(?P<value>[^#]*)").expect("valid regex"))
}

fn libraries_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^LIBRARIES\s*=(?P<value>[^#]*)").expect("valid regex"))
}

/// Extract the first `BOARD = ...` and `LIBRARIES = ...` assignments
///
/// Trailing `#` comments are dropped and values trimmed.
pub fn parse_makefile_variables(content: &str) -> ProjectVariables {
    let mut vars = ProjectVariables::default();
    for line in content.lines() {
        if vars.board.is_none() {
            if let Some(caps) = board_regex().captures(line) {
                vars.board = Some(caps["value"].trim().to_string());
            }
        }
        if vars.libraries.is_none() {
            if let Some(caps) = libraries_regex().captures(line) {
                vars.libraries = Some(caps["value"].trim().to_string());
            }
        }
        if vars.is_complete() {
            break;
        }
    }
    vars
}

/// Split a `LIBRARIES` value into names
pub fn split_libraries(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Path of the project makefile
pub fn makefile_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_MAKEFILE)
}

/// Resolve the board and libraries of the project in `project_dir`
///
/// `overrides` (usually taken from the environment) win over the Makefile,
/// which is only read when something is still missing.
pub fn project_variables(
    project_dir: &Path,
    overrides: ProjectVariables,
) -> Result<(String, Vec<String>), ProjectError> {
    let path = makefile_path(project_dir);
    if !path.is_file() {
        return Err(ProjectError::MakefileMissing {
            path: project_dir.to_path_buf(),
        });
    }

    let vars = if overrides.is_complete() {
        overrides
    } else {
        let content = filesystem::read_file(&path)?;
        overrides.or(parse_makefile_variables(&content))
    };

    let board = vars.board.ok_or_else(|| ProjectError::VariableMissing {
        variable: "BOARD".to_string(),
        path: path.clone(),
    })?;
    let libraries = vars.libraries.ok_or_else(|| ProjectError::VariableMissing {
        variable: "LIBRARIES".to_string(),
        path: path.clone(),
    })?;

    tracing::debug!("Project board {board}, libraries '{libraries}'");
    Ok((board, split_libraries(&libraries)))
}

/// Write a new project makefile, refusing to overwrite an existing one
pub fn init_project(
    project_dir: &Path,
    project: &str,
    board: &str,
    libraries: &[String],
) -> Result<PathBuf, ProjectError> {
    let path = makefile_path(project_dir);
    if path.exists() {
        return Err(ProjectError::MakefileExists { path });
    }

    filesystem::write_file(&path, &render_project_makefile(project, board, libraries))?;
    Ok(path)
}
