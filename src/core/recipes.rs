//! Build recipes
//!
//! A recipe is the makefile `make -f` runs for one library. Recipes are looked
//! up in the configured recipe directory first; the generic library recipe
//! ships inside the binary and is written to the compile root on demand.

use std::path::{Path, PathBuf};

use crate::core::config::Settings;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Generic recipe used for any library without a dedicated one
pub const LIBRARY_RECIPE: &str = include_str!("../../recipes/Library.mk");

/// Template for a new project's makefile
pub const PROJECT_TEMPLATE: &str = include_str!("../../recipes/Project.mk");

const LIBRARY_RECIPE_FILE: &str = "Library.mk";
const SPECIALISED_DIR: &str = "libraries";

/// The makefile selected for a library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Path handed to `make -f`
    pub path: PathBuf,
    /// Whether the recipe is specific to this library
    pub specialised: bool,
}

/// Selects the recipe for each library
#[derive(Debug, Clone)]
pub struct RecipeBook {
    recipe_dir: Option<PathBuf>,
    generic: PathBuf,
}

impl RecipeBook {
    /// Create a recipe book. The embedded recipe lives in `<compile_root>/recipes`.
    pub fn new(recipe_dir: Option<PathBuf>, compile_root: &Path) -> Self {
        Self {
            recipe_dir,
            generic: compile_root.join("recipes").join(LIBRARY_RECIPE_FILE),
        }
    }

    /// Create a recipe book from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.recipe_dir.clone(), &settings.compile_root)
    }

    /// Write the embedded generic recipe unless a custom one replaces it
    ///
    /// An existing copy is replaced when it differs from the embedded one.
    pub fn prepare(&self) -> Result<(), FilesystemError> {
        if self.custom_generic().is_some() {
            return Ok(());
        }
        if filesystem::write_if_changed(&self.generic, LIBRARY_RECIPE)? {
            tracing::debug!("Wrote {}", self.generic.display());
        }
        Ok(())
    }

    /// Recipe for `library`
    ///
    /// `<recipe_dir>/libraries/<library>.mk`, then `<recipe_dir>/Library.mk`,
    /// then the embedded recipe.
    pub fn select(&self, library: &str) -> Recipe {
        if let Some(dir) = &self.recipe_dir {
            let specialised = dir.join(SPECIALISED_DIR).join(format!("{library}.mk"));
            if specialised.is_file() {
                return Recipe {
                    path: specialised,
                    specialised: true,
                };
            }
        }

        Recipe {
            path: self
                .custom_generic()
                .unwrap_or_else(|| self.generic.clone()),
            specialised: false,
        }
    }

    fn custom_generic(&self) -> Option<PathBuf> {
        self.recipe_dir
            .as_ref()
            .map(|dir| dir.join(LIBRARY_RECIPE_FILE))
            .filter(|path| path.is_file())
    }
}

/// Fill in the project makefile template
pub fn render_project_makefile(project: &str, board: &str, libraries: &[String]) -> String {
    PROJECT_TEMPLATE
        .replace("{PROJECT}", project)
        .replace("{BOARD}", board)
        .replace("{LIBRARIES}", &libraries.join(" "))
}
