//! Directory scanning logic for filet.
//!
//! Provides the [DirEntry] struct which is used throughout filet, the [scan_dir]
//! function that produces one ordered listing, and [DirSnapshot], which owns the
//! listing currently on screen together with the directory handle it came from.

use crate::core::formatter::sort_entries;

use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// Classification of a single directory entry.
/// Decides both the coloring of the entry and whether `l` may descend into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Symlink,
    SymlinkToDirectory,
    Executable,
    Regular,
}

impl EntryKind {
    /// Directories and symlinks pointing at directories are browsed alike.
    #[inline]
    pub fn is_dir_like(self) -> bool {
        matches!(self, EntryKind::Directory | EntryKind::SymlinkToDirectory)
    }
}

/// Represents a single entry in a directory listing.
/// Created by [scan_dir] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    name: Box<OsStr>,
    kind: EntryKind,
}

impl DirEntry {
    /// Used to set the Executable kind for regular files with the owner execute bit.
    #[cfg(unix)]
    pub(super) const OWNER_EXEC: u32 = 0o100;

    pub fn new(name: impl Into<OsString>, kind: EntryKind) -> Self {
        DirEntry {
            name: name.into().into_boxed_os_str(),
            kind,
        }
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[inline(always)]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[inline]
    pub fn is_dir_like(&self) -> bool {
        self.kind.is_dir_like()
    }
}

/// Returns true for dotfiles. `.` and `..` never reach this check.
#[inline]
pub fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// Classifies an entry from its non-following metadata.
/// Symlinks are resolved once more to tell links to directories apart.
fn classify(path: &Path, md: &Metadata) -> EntryKind {
    let ft = md.file_type();
    if ft.is_dir() {
        return EntryKind::Directory;
    }
    if ft.is_symlink() {
        return match fs::metadata(path) {
            Ok(target) if target.is_dir() => EntryKind::SymlinkToDirectory,
            _ => EntryKind::Symlink,
        };
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if md.permissions().mode() & DirEntry::OWNER_EXEC != 0 {
            return EntryKind::Executable;
        }
    }

    EntryKind::Regular
}

/// Reads the contents of the provided directory into an ordered vector of [DirEntry].
///
/// Dotfiles are dropped before any metadata is fetched unless `show_hidden` is set.
/// Entries whose metadata cannot be read are skipped.
///
/// # Returns
/// The sorted entries, or the std::io::Error from opening the directory.
pub fn scan_dir(path: &Path, show_hidden: bool) -> io::Result<Vec<DirEntry>> {
    let mut entries = Vec::with_capacity(64);

    for entry in fs::read_dir(path)? {
        let Ok(entry) = entry else {
            continue;
        };

        let name = entry.file_name();
        if !show_hidden && is_hidden(&name) {
            continue;
        }

        // DirEntry::metadata does not traverse symlinks
        let md = match entry.metadata() {
            Ok(md) => md,
            Err(_) => continue,
        };

        let kind = classify(&entry.path(), &md);
        entries.push(DirEntry::new(name, kind));
    }

    sort_entries(&mut entries);
    Ok(entries)
}

/// The listing on screen plus the directory handle it was read from.
///
/// At most one directory is held open at a time. [DirSnapshot::replace] releases the
/// previous one before reading the next, and deletions are resolved against the
/// held directory rather than against whatever path the navigator shows now.
///
/// The handle is the path of the scanned directory, not an open descriptor.
/// Names are resolved through it again at deletion time, so a directory renamed
/// or replaced after the scan is not followed.
#[derive(Debug, Default)]
pub struct DirSnapshot {
    handle: Option<PathBuf>,
    entries: Vec<DirEntry>,
    error: Option<io::Error>,
}

impl DirSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    // Accessors

    #[inline]
    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&DirEntry> {
        self.entries.get(idx)
    }

    /// The error from the last scan if the directory could not be opened.
    #[inline]
    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// The directory currently held open, if any.
    #[inline]
    pub fn dir(&self) -> Option<&Path> {
        self.handle.as_deref()
    }

    /// Replaces the snapshot with a fresh scan of `path`.
    ///
    /// Failing to open the directory is not fatal: the snapshot becomes empty and
    /// remembers the error so the UI can say why.
    pub fn replace(&mut self, path: &Path, show_hidden: bool) {
        self.handle = None;

        match scan_dir(path, show_hidden) {
            Ok(entries) => {
                log::debug!("scanned {}: {} entries", path.display(), entries.len());
                self.entries = entries;
                self.error = None;
                self.handle = Some(path.to_path_buf());
            }
            Err(e) => {
                log::warn!("cannot read {}: {}", path.display(), e);
                self.entries.clear();
                self.error = Some(e);
            }
        }
    }

    /// Deletes `name` from the directory held open by the last successful scan.
    ///
    /// The held path is joined with `name` and removed by path. If that path now
    /// names a different directory than the one scanned, the entry is removed
    /// from there instead.
    ///
    /// Only real directories are removed with `remove_dir`; symlinks to directories
    /// are unlinked like files. Non-empty directories are refused by the OS.
    pub fn delete_by_name(&self, name: &OsStr, is_directory: bool) -> io::Result<()> {
        let Some(dir) = self.handle.as_deref() else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "no directory is open",
            ));
        };

        let target = dir.join(name);
        if is_directory {
            fs::remove_dir(&target)
        } else {
            fs::remove_file(&target)
        }
    }
}
