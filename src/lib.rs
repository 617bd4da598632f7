//! Xuino - command-line Arduino toolkit
//!
//! Resolves the libraries an Arduino project depends on and compiles each of
//! them in parallel with `make`, so that a plain project makefile can link
//! against the results.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Dependency resolution and build orchestration
//! - [`infra`] - Infrastructure layer (filesystem, external processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
