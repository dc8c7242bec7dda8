//! Navigation state for filet.
//!
//! Manages the current directory, the selection, the viewport and the
//! hidden-file toggle. Knows nothing about the entries themselves beyond
//! their count, which keeps every transition checkable without a filesystem.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// A selection change that can be drawn in place.
///
/// Holds the previous and new selection together with the viewport offset
/// before and after, so the renderer can tell whether it has to scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motion {
    pub from: usize,
    pub to: usize,
    pub old_offset: usize,
    pub new_offset: usize,
}

impl Motion {
    #[inline]
    pub fn scrolled(&self) -> bool {
        self.old_offset != self.new_offset
    }
}

/// Holds the navigation and selection state of the browser.
#[derive(Debug)]
pub struct NavState {
    current_dir: PathBuf,
    selected: usize,
    offset: usize,
    show_hidden: bool,
    dirty: bool,
}

impl NavState {
    /// Starts at `path` with nothing scanned yet.
    pub fn new(path: PathBuf) -> Self {
        Self {
            current_dir: path,
            selected: 0,
            offset: 0,
            show_hidden: false,
            dirty: true,
        }
    }

    // Getters / Accessors

    #[inline]
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    #[inline]
    pub fn selected_idx(&self) -> usize {
        self.selected
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[inline]
    pub fn needs_rescan(&self) -> bool {
        self.dirty
    }

    // Dirty transitions

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Replaces the current directory.
    pub fn set_path(&mut self, path: PathBuf) {
        self.current_dir = path;
        self.dirty = true;
    }

    /// Moves to the parent directory.
    /// Returns `false` at the root, which has no parent.
    pub fn go_parent(&mut self) -> bool {
        match self.current_dir.parent() {
            Some(parent) => {
                let parent = parent.to_path_buf();
                self.set_path(parent);
                true
            }
            None => false,
        }
    }

    /// Descends into `name` below the current directory.
    pub fn go_into(&mut self, name: &OsStr) {
        self.current_dir.push(name);
        self.dirty = true;
    }

    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        self.dirty = true;
    }

    /// Called once a fresh scan is on screen: selection back to the top.
    pub fn finish_rescan(&mut self) {
        self.selected = 0;
        self.offset = 0;
        self.dirty = false;
    }

    // Local transitions

    /// Moves the selection down by one entry. Stops at the last entry.
    pub fn move_down(&mut self, len: usize, rows: usize) -> Option<Motion> {
        if self.selected + 1 >= len {
            return None;
        }
        Some(self.select(self.selected + 1, rows))
    }

    /// Moves the selection up by one entry. Stops at the first entry.
    pub fn move_up(&mut self, len: usize, rows: usize) -> Option<Motion> {
        if len == 0 || self.selected == 0 {
            return None;
        }
        Some(self.select(self.selected - 1, rows))
    }

    pub fn first_selected(&mut self, len: usize, rows: usize) -> Option<Motion> {
        if len == 0 {
            return None;
        }
        Some(self.select(0, rows))
    }

    pub fn last_selected(&mut self, len: usize, rows: usize) -> Option<Motion> {
        if len == 0 {
            return None;
        }
        Some(self.select(len - 1, rows))
    }

    /// Keeps the selection on screen after the list area changed size.
    /// Also pulls the viewport back when a taller terminal leaves rows unused.
    pub fn fit_viewport(&mut self, len: usize, rows: usize) {
        let rows = rows.max(1);
        self.offset = self.offset.min(len.saturating_sub(rows));
        self.scroll_to_selection(rows);
    }

    /// Screen position of entry `idx` within the list area, if visible.
    pub fn visible_row(&self, idx: usize, rows: usize) -> Option<usize> {
        (idx >= self.offset && idx < self.offset + rows).then(|| idx - self.offset)
    }

    fn select(&mut self, to: usize, rows: usize) -> Motion {
        let from = self.selected;
        let old_offset = self.offset;

        self.selected = to;
        self.scroll_to_selection(rows.max(1));

        Motion {
            from,
            to,
            old_offset,
            new_offset: self.offset,
        }
    }

    fn scroll_to_selection(&mut self, rows: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + rows {
            self.offset = self.selected + 1 - rows;
        }
    }
}
