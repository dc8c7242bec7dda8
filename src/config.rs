//! Runtime configuration for filet.
//!
//! filet has no configuration file. Everything it needs from the outside
//! world is resolved once at startup from the environment:
//! - `EDITOR` for `e` (default `vi`)
//! - `SHELL` for `s` (default `/bin/sh`)
//! - `HOME` for `~` (default: the platform home directory, then `/`)
//! - `USER`/`LOGNAME` and the kernel hostname for the status line
//! - `FILET_LOG`, an optional path for the debug log

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_EDITOR: &str = "vi";
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Files the hostname is read from, in order.
const HOSTNAME_FILES: &[&str] = &["/proc/sys/kernel/hostname", "/etc/hostname"];

/// Resolved environment for one run of filet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    editor: String,
    shell: String,
    home: PathBuf,
    user: String,
    host: String,
    log_file: Option<PathBuf>,
}

impl Config {
    /// Resolves the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Resolves the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let string_var = |key: &str| var(key).map(|v| v.to_string_lossy().trim().to_string());

        let home = var("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("/"));

        let user = string_var("USER")
            .or_else(|| string_var("LOGNAME"))
            .unwrap_or_else(|| "?".to_string());

        let host = read_hostname()
            .or_else(|| string_var("HOSTNAME"))
            .unwrap_or_else(|| "localhost".to_string());

        Config {
            editor: string_var("EDITOR").unwrap_or_else(|| DEFAULT_EDITOR.to_string()),
            shell: string_var("SHELL").unwrap_or_else(|| DEFAULT_SHELL.to_string()),
            home,
            user,
            host,
            log_file: var("FILET_LOG").map(PathBuf::from),
        }
    }

    // Accessors

    #[inline]
    pub fn editor(&self) -> &str {
        &self.editor
    }

    #[inline]
    pub fn shell(&self) -> &str {
        &self.shell
    }

    #[inline]
    pub fn home(&self) -> &Path {
        &self.home
    }

    #[inline]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

fn read_hostname() -> Option<String> {
    HOSTNAME_FILES.iter().find_map(|path| {
        let name = fs::read_to_string(path).ok()?;
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    })
}
