//! Infrastructure layer
//!
//! Handles I/O operations: the filesystem, platform directories, library
//! lookup on disk and the external build tool.

pub mod dirs;
pub mod filesystem;
pub mod make;
pub mod sources;
