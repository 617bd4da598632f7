//! Output formatting and progress indicators
//!
//! This module provides the spinner shown while libraries compile, the
//! printing of build logs, and error display.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::error::{format_build_logs, BuildError, LibraryOutput};

/// How much the user wants to see
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Only errors
    pub quiet: bool,
    /// Machine-readable output
    pub json: bool,
    /// Verbosity level from repeated `-v`
    pub verbose: u8,
}

impl OutputConfig {
    /// Create an output configuration
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Tracing level implied by the flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }

    /// Spinner, hidden when output is quiet or JSON
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.quiet || self.json {
            ProgressBar::hidden()
        } else {
            create_spinner(message)
        }
    }

    /// Print a status line unless quiet or JSON
    pub fn status(&self, message: &str) {
        if !self.quiet && !self.json {
            println!("{} {message}", status::SUCCESS);
        }
    }

    /// Print build logs unless quiet
    pub fn build_logs(&self, outputs: &[LibraryOutput]) {
        if !self.quiet {
            print!("{}", format_build_logs(outputs));
        }
    }

    /// Print build logs to stderr unless quiet, keeping stdout for values
    pub fn build_logs_to_stderr(&self, outputs: &[LibraryOutput]) {
        if !self.quiet {
            eprint!("{}", format_build_logs(outputs));
        }
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// Create a spinner for operations with unknown duration
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Print an error and its causes to stderr
///
/// A failed library build prints every library's log first.
pub fn display_error(error: &anyhow::Error) {
    if let Some(build) = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<BuildError>())
    {
        eprint!("{}", build.logs());
    }

    eprintln!("{} Error: {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  Caused by: {cause}");
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";
}
