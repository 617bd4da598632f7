//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use std::path::PathBuf;

    use proptest::prelude::*;

    /// Generate a library name (case-sensitive, never a reserved name)
    pub fn library_name() -> impl Strategy<Value = String> {
        "[A-Z][A-Za-z0-9_]{0,15}"
    }

    /// Generate a board short name as found in boards.txt
    pub fn board_id() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,12}"
    }

    /// Generate an absolute directory path
    pub fn source_dir() -> impl Strategy<Value = PathBuf> {
        "/[a-z]{1,10}(/[a-z]{1,10}){0,3}".prop_map(PathBuf::from)
    }

    /// Generate a list of distinct library names
    pub fn library_list(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set(library_name(), 0..max)
            .prop_map(|names| names.into_iter().collect())
    }
}
