//! Integration tests for `xuino init`, `xuino list`, `xuino clean` and
//! `xuino make`

mod common;

use common::{make_available, stderr, stdout, TestProject, ECHO_RECIPE, FAILING_RECIPE};

/// Project makefile that prints what xuino hands it instead of compiling
const REPORTING_MAKEFILE: &str = "\
BOARD = uno  # the board
LIBRARIES = Ethernet

all:
\t@echo flags=$(BOARD_C_FLAGS)
\t@echo libs=$(LIB_INCLUDES)
";

// ============================================
// no command
// ============================================

#[test]
fn test_no_command_prints_help_and_fails() {
    let project = TestProject::new();

    let output = project.run(&[]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Usage:"), "stderr: {err}");
    assert!(err.contains("No command given"));
    assert!(stdout(&output).is_empty());
}

// ============================================
// init
// ============================================

#[test]
fn test_init_creates_makefile() {
    let project = TestProject::new();

    let output = project.run(&["init", "--name", "blink", "--board", "uno", "--libraries", "SPI", "Servo"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let makefile = project.read_file("project/Makefile");
    assert!(makefile.contains("PROJECT = blink\n"));
    assert!(makefile.contains("BOARD = uno\n"));
    assert!(makefile.contains("LIBRARIES = SPI Servo\n"));
    assert!(stdout(&output).contains("Successfully created a new makefile."));
}

#[test]
fn test_init_in_subdirectory() {
    let project = TestProject::new();

    let output = project.run(&["init", "sketch", "--name", "blink", "--board", "uno"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(project.file_exists("project/sketch/Makefile"));
}

#[test]
fn test_init_refuses_existing_makefile() {
    let project = TestProject::new();
    project.create_file("project/Makefile", "keep");

    let output = project.run(&["init", "--name", "blink", "--board", "uno"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("exists!"));
    assert_eq!(project.read_file("project/Makefile"), "keep");
}

#[test]
fn test_init_rejects_unknown_board() {
    let project = TestProject::new();

    let output = project.run(&["init", "--name", "blink", "--board", "nano"]);

    assert!(!output.status.success());
    assert!(!project.file_exists("project/Makefile"));
}

// ============================================
// list
// ============================================

#[test]
fn test_list_boards() {
    let project = TestProject::new();

    let output = project.run(&["list"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "mega2560\t'Arduino Mega 2560'\nuno\t\t'Arduino Uno'\n"
    );
}

#[test]
fn test_list_boards_json() {
    let project = TestProject::new();

    let output = project.run(&["--json", "list"]);

    let boards: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(boards[1]["id"], "uno");
    assert_eq!(boards[1]["name"], "Arduino Uno");
}

#[test]
fn test_missing_version_is_reported() {
    let project = TestProject::new();
    std::fs::remove_file(project.root().join("arduino/lib/version.txt")).unwrap();

    let output = project.run(&["list"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unable to find version.txt"));
}

// ============================================
// clean
// ============================================

#[test]
fn test_clean_removes_compile_root() {
    let project = TestProject::new();
    project.create_file("compile/uno/SPI/libspi.a", "");

    let output = project.run(&["clean"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(!project.compile_root().exists());
    assert!(stdout(&output).contains("uno"));
}

#[test]
fn test_clean_without_cache() {
    let project = TestProject::new();

    let output = project.run(&["clean"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Nothing to clean"));
}

#[test]
fn test_quiet_clean_prints_nothing() {
    let project = TestProject::new();

    let output = project.run(&["-q", "clean"]);

    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
}

// ============================================
// make
// ============================================

#[test]
fn test_make_without_makefile() {
    let project = TestProject::new();

    let output = project.run(&["make"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("xuino init"));
}

#[test]
fn test_make_builds_libraries_then_project() {
    if !make_available() {
        return;
    }
    let project = TestProject::new();
    project.use_recipe(ECHO_RECIPE);
    project.create_file("project/Makefile", REPORTING_MAKEFILE);
    let compile = project.compile_root().join("uno");

    let output = project.run(&["make"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("-- Output from Ethernet make command --"));
    assert!(out.contains("flags=-mmcu=atmega328p -DF_CPU=16000000L -DARDUINO=105"));
    assert!(out.contains(&format!(
        "libs=-L {} -L {} -L {} -L {} -lethernet -lspi -lcore -lm",
        compile.join("Ethernet").display(),
        compile.join("SPI").display(),
        compile.join("core").display(),
        compile.join("m").display(),
    )));
    assert!(out.contains("Success!"));
}

#[test]
fn test_make_board_from_environment() {
    if !make_available() {
        return;
    }
    let project = TestProject::new();
    project.use_recipe(ECHO_RECIPE);
    project.create_file("project/Makefile", REPORTING_MAKEFILE);

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_xuino"))
        .current_dir(project.path())
        .env("XUINO_CONFIG_DIR", project.root().join("config"))
        .env("BOARD", "mega2560")
        .env("LIBRARIES", "")
        .arg("make")
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("flags=-mmcu=atmega2560"));
    assert!(!out.contains("-- Output from Ethernet make command --"));
}

#[test]
fn test_make_stops_when_a_library_fails() {
    if !make_available() {
        return;
    }
    let project = TestProject::new();
    project.use_recipe(FAILING_RECIPE);
    project.create_file("project/Makefile", REPORTING_MAKEFILE);

    let output = project.run(&["make"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("-- Output from core make command --"));
    assert!(!stdout(&output).contains("flags="));
}
