//! Process launching for filet.
//!
//! [spawn] runs the editor or the shell in the foreground: it hands the real
//! terminal back ([Handoff::suspend]), runs the child with inherited standard
//! streams in the browsed directory, waits for it to exit, and takes the
//! terminal again ([Handoff::resume]).

use crate::error::Result;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Gives the terminal away to a child process and takes it back afterwards.
pub trait Handoff {
    fn suspend(&mut self) -> Result<()>;
    fn resume(&mut self) -> Result<()>;
}

/// A program to run in the foreground with at most one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launch {
    program: String,
    arg: Option<OsString>,
    cwd: PathBuf,
}

impl Launch {
    pub fn new(program: impl Into<String>, arg: Option<OsString>, cwd: PathBuf) -> Self {
        Self {
            program: program.into(),
            arg,
            cwd,
        }
    }

    // Accessors

    #[inline]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[inline]
    pub fn arg(&self) -> Option<&OsString> {
        self.arg.as_ref()
    }

    #[inline]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

/// What happened to a launched child.
#[derive(Debug)]
pub enum LaunchOutcome {
    /// The child ran and exited (or was killed by a signal).
    Exited(ExitStatus),
    /// The child could not be started. Holds a message for the status line.
    Failed(String),
}

/// Runs `launch` in the foreground and blocks until it exits.
///
/// The child shares filet's process group and the terminal is in its normal
/// mode while it runs, so an interrupt typed there reaches both. Programs that
/// put the terminal in raw mode themselves (most editors, interactive shells)
/// never see it as a signal.
///
/// A program that cannot be found is reported without touching the terminal.
/// Only failures to give up or retake the terminal are returned as errors;
/// everything about the child itself ends up in the [LaunchOutcome].
pub fn spawn<H: Handoff>(term: &mut H, launch: &Launch) -> Result<LaunchOutcome> {
    if let Err(e) = which::which(launch.program()) {
        log::warn!("{} not found: {}", launch.program(), e);
        return Ok(LaunchOutcome::Failed(format!(
            "{}: command not found",
            launch.program()
        )));
    }

    log::info!(
        "launching {} {:?} in {}",
        launch.program(),
        launch.arg(),
        launch.cwd().display()
    );

    term.suspend()?;

    let status = Command::new(launch.program())
        .args(launch.arg())
        .current_dir(launch.cwd())
        .status();

    term.resume()?;

    Ok(match status {
        Ok(status) => {
            if !status.success() {
                log::info!("{} exited with {}", launch.program(), status);
            }
            LaunchOutcome::Exited(status)
        }
        Err(e) => {
            log::warn!("failed to run {}: {}", launch.program(), e);
            LaunchOutcome::Failed(format!("{}: {}", launch.program(), e))
        }
    })
}
