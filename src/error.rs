//! Error types for filet.
//!
//! Only terminal failures are fatal. Everything that can go wrong while
//! browsing (unreadable directories including the starting one, failed
//! deletions, missing editors) is degraded and shown on screen instead of
//! surfacing here.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// stdin or stdout is not an interactive terminal.
    #[error("not connected to a tty")]
    NotATty,

    /// Querying or setting the terminal attributes failed.
    #[error("terminal setup failed: {0}")]
    Terminal(#[source] io::Error),

    /// The terminal size could not be determined.
    #[error("cannot determine terminal size: {0}")]
    Geometry(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
