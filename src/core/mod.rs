//! Core business logic module
//!
//! Dependency resolution, source lookup and build orchestration. Process
//! execution lives in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`catalog`] - Library dependency catalog
//! - [`resolver`] - Dependency graph and build order
//! - [`board`] - `boards.txt` parsing and compiler flags
//! - [`config`] - Layered configuration and resolved settings
//! - [`sources`] - Source locator trait and flag rendering
//! - [`build_env`] - Build environment setup
//! - [`recipes`] - Library recipes and the project template
//! - [`builder`] - Parallel build orchestration
//! - [`project`] - Project makefile handling
//! - [`clean`] - Compiled library cache removal
//! - [`session`] - Per-command wiring of the above

pub mod board;
pub mod build_env;
pub mod builder;
pub mod catalog;
pub mod clean;
pub mod config;
pub mod project;
pub mod recipes;
pub mod resolver;
pub mod session;
pub mod sources;
