//! Core runtime logic for filet.
//!
//! This module contains the non-UI "engine" pieces used by the application:
//! - [fm]: directory scanning, entry classification and the on-screen [DirSnapshot].
//! - [formatter]: the listing order and width-safe text for the terminal.
//! - [proc]: running the editor or shell in the foreground.
//! - [terminal]: terminal setup/teardown and the main crossterm event loop.

pub mod fm;
pub mod formatter;
pub mod proc;
pub mod terminal;

pub use fm::{DirEntry, DirSnapshot, EntryKind, scan_dir};
pub use formatter::{sanitize_to_width, sort_entries};
pub use proc::{Handoff, Launch, LaunchOutcome, spawn};
pub use terminal::{Geometry, Surface};
