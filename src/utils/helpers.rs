//! Helpers for filet.
//!
//! - Resolving the starting directory from the command line
//! - Lexical path normalization, so `h` walks real parents
//! - Installing the optional file logger

use crate::config::Config;
use crate::error::Result;

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use std::fs::File;
use std::path::{Component, Path, PathBuf};

/// Resolves the directory to start in: `arg` if given, else the working directory.
///
/// Relative paths are made absolute and normalized. The filesystem is not
/// consulted: a path that cannot be read starts as an unreadable listing, from
/// which `h`, `~` and `/` still lead somewhere useful.
pub fn resolve_initial_dir(arg: Option<&str>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match arg {
        Some(arg) => normalize_path(&cwd.join(expand_home(arg))),
        None => cwd,
    })
}

/// Expands a leading `~` the way a shell would have, for paths passed quoted.
fn expand_home(arg: &str) -> PathBuf {
    match arg.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(arg),
        },
        _ => PathBuf::from(arg),
    }
}

/// Removes `.` components and resolves `..` against the preceding component
/// without touching the filesystem. `..` at the root stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(Component::RootDir.as_os_str());
    }
    out
}

/// Installs a file logger when `FILET_LOG` names a file. The terminal belongs to
/// the UI, so there is no fallback to stderr.
pub fn init_logging(config: &Config) {
    let Some(path) = config.log_file() else {
        return;
    };

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    match File::create(path) {
        Ok(file) => {
            let _ = WriteLogger::init(LevelFilter::Debug, log_config, file);
            log::info!("filet {} starting", env!("CARGO_PKG_VERSION"));
        }
        Err(e) => eprintln!("[filet] Warning: cannot open log file {}: {}", path.display(), e),
    }
}
