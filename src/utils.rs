//! Miscellaneous utility functions for filet.
//!
//! - [cli]: argument parsing, `--help` and `--version`
//! - [helpers]: starting directory resolution, path normalization, logging setup

pub mod cli;
pub mod helpers;

pub use helpers::{init_logging, normalize_path, resolve_initial_dir};
