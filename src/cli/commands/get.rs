//! CLI implementation for `xuino get` subcommands
//!
//! These print values meant to be captured by makefiles, so plain output is a
//! single line and progress is never shown on stdout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::commands::load_session;
use crate::cli::output::OutputConfig;
use crate::config::defaults::DEFAULT_VARIANT;
use crate::core::sources::{include_flags, join_dirs, link_dir_flags, link_name_flags};

/// Flags of `xuino get lib`
#[derive(Debug, Clone, Copy, Default)]
pub struct LibOptions {
    /// Prefix each directory with `-L`
    pub dash_big_l: bool,
    /// Append `-l<name>` for each library
    pub dash_little_l: bool,
}

#[derive(Serialize)]
struct SourceReport<'a> {
    libraries: &'a [String],
    src_dirs: &'a [PathBuf],
}

#[derive(Serialize)]
struct LibReport<'a> {
    board: &'a str,
    libraries: &'a [String],
    lib_dirs: &'a [PathBuf],
    outputs: Vec<LibraryLog<'a>>,
}

#[derive(Serialize)]
struct LibraryLog<'a> {
    library: &'a str,
    output: &'a str,
}

/// Print a board property, e.g. `uno.build.f_cpu`
pub async fn execute_property(current_dir: &Path, property: &str) -> Result<()> {
    let session = load_session(current_dir)?;
    let boards = session.boards()?;
    println!("{}", boards.property(property)?);
    Ok(())
}

/// Print the compiler flags for a board
pub async fn execute_cflags(current_dir: &Path, board: &str) -> Result<()> {
    let session = load_session(current_dir)?;
    let board = session.board(board)?;
    println!("{}", board.cflags(session.settings.arduino_ver)?);
    Ok(())
}

/// Print the source directories of the requested libraries and their dependencies
pub async fn execute_src(
    current_dir: &Path,
    libraries: &[String],
    board: Option<&str>,
    dash_i: bool,
    output: &OutputConfig,
) -> Result<()> {
    let session = load_session(current_dir)?;

    let board_info = board.map(|id| session.board(id)).transpose()?;
    let variant = match &board_info {
        Some(info) => info.variant()?,
        None => DEFAULT_VARIANT,
    };

    let libraries = session.resolve(libraries)?;
    let src_dirs = session.source_dirs(&libraries, variant)?;

    if output.json {
        return output.print_json(&SourceReport {
            libraries: &libraries,
            src_dirs: &src_dirs,
        });
    }

    if dash_i {
        println!("{}", include_flags(&src_dirs));
    } else {
        println!("{}", join_dirs(&src_dirs));
    }
    Ok(())
}

/// Print the object file names of one library
pub async fn execute_obj(current_dir: &Path, library: &str) -> Result<()> {
    let session = load_session(current_dir)?;
    // variant directories only hold headers, so any variant will do
    let objects = session.object_files(library, DEFAULT_VARIANT)?;
    println!("{}", objects.join(" "));
    Ok(())
}

/// Print the build order for the requested libraries
pub async fn execute_deps(
    current_dir: &Path,
    libraries: &[String],
    output: &OutputConfig,
) -> Result<()> {
    let session = load_session(current_dir)?;
    let order = session.resolve(libraries)?;

    if output.json {
        return output.print_json(&order);
    }
    println!("{}", order.join(" "));
    Ok(())
}

/// Compile the requested libraries and print where they are
pub async fn execute_lib(
    current_dir: &Path,
    libraries: &[String],
    board: &str,
    options: LibOptions,
    output: &OutputConfig,
) -> Result<()> {
    let session = load_session(current_dir)?;
    let board_info = session.board(board)?;
    let libraries = session.resolve(libraries)?;

    let spinner = output.spinner(&format!("Compiling {} libraries...", libraries.len()));
    let result = session.build_libraries(&libraries, &board_info).await;
    spinner.finish_and_clear();
    let report = result.context("Fatal error, unable to compile all libraries")?;

    if output.json {
        return output.print_json(&LibReport {
            board,
            libraries: &libraries,
            lib_dirs: &report.artifacts,
            outputs: report
                .outputs
                .iter()
                .map(|entry| LibraryLog {
                    library: &entry.library,
                    output: &entry.output,
                })
                .collect(),
        });
    }

    if output.verbose > 0 {
        output.build_logs_to_stderr(&report.outputs);
    }

    println!("{}", format_lib_dirs(&report.artifacts, options));
    Ok(())
}

/// Directories, optionally as `-L` flags, optionally followed by `-l` names
pub fn format_lib_dirs(dirs: &[PathBuf], options: LibOptions) -> String {
    let mut rendered = if options.dash_big_l {
        link_dir_flags(dirs)
    } else {
        join_dirs(dirs)
    };
    if options.dash_little_l {
        rendered.push(' ');
        rendered.push_str(&link_name_flags(dirs));
    }
    rendered
}
