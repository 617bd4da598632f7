//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a throwaway
//! Arduino installation, a config pointing at it, and a project directory.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// boards.txt with two boards
pub const BOARDS_TXT: &str = "\
# Test boards
uno.name=Arduino Uno
uno.build.mcu=atmega328p
uno.build.f_cpu=16000000L
uno.build.variant=standard

mega2560.name=Arduino Mega 2560
mega2560.build.mcu=atmega2560
mega2560.build.f_cpu=16000000L
mega2560.build.variant=mega
";

/// Library recipe that only reports what it was given
#[allow(dead_code)]
pub const ECHO_RECIPE: &str = "all:\n\t@echo built $(LIBRARY) from $(LIBOBJS)\n";

/// Recipe that always fails
#[allow(dead_code)]
pub const FAILING_RECIPE: &str = "all:\n\t@echo compiling $(LIBRARY)\n\t@echo broken >&2; exit 1\n";

/// Test project context
///
/// Creates a temporary directory holding an Arduino installation under
/// `arduino/`, the global config under `config/`, the compiled library cache
/// under `compile/` and the project itself under `project/`.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        project.create_arduino_installation();
        project.create_dir("project");
        project.write_config("");
        project
    }

    /// Get the path to the temporary root
    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Get the path to the project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("project")
    }

    /// Get the path to the compiled library cache
    #[allow(dead_code)]
    pub fn compile_root(&self) -> PathBuf {
        self.dir.path().join("compile")
    }

    /// Create a file relative to the temporary root
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory relative to the temporary root
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists relative to the temporary root
    #[allow(dead_code)]
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file relative to the temporary root
    #[allow(dead_code)]
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Write the global config, with `extra` appended to the `[xuino]` table
    pub fn write_config(&self, extra: &str) {
        let root = self.root();
        let config = format!(
            "[xuino]\narduino_root = \"{}\"\ncompile_root = \"{}\"\n{extra}",
            root.join("arduino").display(),
            root.join("compile").display(),
        );
        self.create_file("config/config.toml", &config);
    }

    /// Use recipes from `recipes/` with the given generic recipe
    #[allow(dead_code)]
    pub fn use_recipe(&self, recipe: &str) {
        self.create_file("recipes/Library.mk", recipe);
        self.write_config(&format!(
            "recipe_dir = \"{}\"\n",
            self.root().join("recipes").display()
        ));
    }

    /// Run xuino in the project directory
    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_xuino"));
        cmd.current_dir(self.path())
            .env("XUINO_CONFIG_DIR", self.root().join("config"))
            .env("XUINO_CACHE_DIR", self.root().join("cache"))
            .env_remove("BOARD")
            .env_remove("LIBRARIES")
            .env_remove("RUST_LOG")
            .args(args);
        cmd.output().expect("Failed to execute xuino")
    }

    fn create_arduino_installation(&self) {
        self.create_file("arduino/lib/version.txt", "1.0.5\n");
        self.create_file("arduino/hardware/arduino/boards.txt", BOARDS_TXT);
        self.create_file("arduino/hardware/arduino/cores/arduino/Arduino.h", "");
        self.create_file("arduino/hardware/arduino/cores/arduino/wiring.c", "");
        self.create_file("arduino/hardware/arduino/cores/arduino/main.cpp", "");
        self.create_file("arduino/hardware/arduino/cores/arduino/avr-libc/malloc.c", "");
        self.create_file("arduino/hardware/arduino/variants/standard/pins_arduino.h", "");
        self.create_file("arduino/hardware/arduino/variants/mega/pins_arduino.h", "");
        self.create_file("arduino/libraries/SPI/SPI.cpp", "");
        self.create_file("arduino/libraries/SPI/SPI.h", "");
        self.create_file("arduino/libraries/Ethernet/Ethernet.cpp", "");
        self.create_file("arduino/libraries/Ethernet/utility/w5100.cpp", "");
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// stdout as a string
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// stderr as a string
#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Whether `make` is installed, for tests that run real builds
#[allow(dead_code)]
pub fn make_available() -> bool {
    which::which("make").is_ok()
}
