//! Application state and main controller module for filet.
//!
//! This module defines the [AppState] struct, which holds everything the
//! browser knows while it runs:
//! - the resolved [Config]
//! - the navigation state (path, selection, viewport, hidden toggle)
//! - the directory snapshot on screen
//! - the last known terminal geometry
//! - a one-line message for errors that do not stop the program
//!
//! [AppState::handle_keypress] turns one key into one transition and tells the
//! event loop how much of the screen has to be redrawn.

use crate::app::keymap::{self, Action, FileAction, NavAction, SystemAction};
use crate::app::nav::{Motion, NavState};
use crate::config::Config;
use crate::core::terminal::Geometry;
use crate::core::{DirEntry, DirSnapshot, EntryKind, Launch, LaunchOutcome};

use std::path::{Path, PathBuf};

/// Result of one keypress, telling the event loop what to do next.
///
/// Dirty transitions (path or filter changes, deletions) do not show up here;
/// the loop sees them through [AppState::needs_rescan].
#[derive(Debug, PartialEq, Eq)]
pub enum KeypressResult {
    Continue,
    Quit,
    /// The selection changed; only the affected lines need drawing.
    Moved(Motion),
    /// Run a program in the foreground, then call [AppState::finish_launch].
    Launch(Launch),
}

/// Main struct which holds the central application state of filet.
#[derive(Debug)]
pub struct AppState {
    config: Config,
    nav: NavState,
    snapshot: DirSnapshot,
    geometry: Geometry,
    message: Option<String>,
}

impl AppState {
    /// Creates the state for browsing `path`. Nothing is read until [AppState::rescan].
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            config,
            nav: NavState::new(path),
            snapshot: DirSnapshot::new(),
            geometry: Geometry::default(),
            message: None,
        }
    }

    // Getters / Accessors

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    #[inline]
    pub fn snapshot(&self) -> &DirSnapshot {
        &self.snapshot
    }

    #[inline]
    pub fn entries(&self) -> &[DirEntry] {
        self.snapshot.entries()
    }

    #[inline]
    pub fn current_dir(&self) -> &Path {
        self.nav.current_dir()
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[inline]
    pub fn needs_rescan(&self) -> bool {
        self.nav.needs_rescan()
    }

    pub fn selected_entry(&self) -> Option<&DirEntry> {
        self.snapshot.get(self.nav.selected_idx())
    }

    /// Rows of the terminal available to the list.
    #[inline]
    fn list_rows(&self) -> usize {
        self.geometry.list_rows()
    }

    // Event loop hooks

    /// Reads the current directory again and resets the selection.
    pub fn rescan(&mut self) {
        self.snapshot
            .replace(self.nav.current_dir(), self.nav.show_hidden());
        self.nav.finish_rescan();
    }

    /// Takes a new terminal size and keeps the selection visible in it.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.nav
            .fit_viewport(self.snapshot.len(), geometry.list_rows());
    }

    /// Records how a launched program ended. The directory is always read
    /// again because the program may have changed it.
    pub fn finish_launch(&mut self, launch: &Launch, outcome: LaunchOutcome) {
        match outcome {
            LaunchOutcome::Exited(status) => {
                log::debug!("{} finished: {}", launch.program(), status);
            }
            LaunchOutcome::Failed(msg) => self.message = Some(msg),
        }
        self.nav.mark_dirty();
    }

    /// Main keypress handler. Maps the key through the keymap and dispatches
    /// the resulting action. Unbound keys do nothing.
    pub fn handle_keypress(&mut self, key: char) -> KeypressResult {
        let Some(action) = keymap::action_for(key) else {
            return KeypressResult::Continue;
        };

        // a message stays until the screen is redrawn after the next key
        self.message = None;

        match action {
            Action::Nav(a) => self.handle_nav_action(a),
            Action::File(a) => self.handle_file_action(a),
            Action::System(a) => self.handle_sys_action(a),
        }
    }

    /// Handles navigation actions (parent, into dir, up, down, etc).
    fn handle_nav_action(&mut self, action: NavAction) -> KeypressResult {
        let len = self.snapshot.len();
        let rows = self.list_rows();

        let motion = match action {
            NavAction::GoParent => {
                if self.nav.go_parent() {
                    log::debug!("parent: {}", self.nav.current_dir().display());
                }
                None
            }
            NavAction::GoHome => {
                let home = self.config.home().to_path_buf();
                self.nav.set_path(home);
                None
            }
            NavAction::GoRoot => {
                let root = root_of(self.nav.current_dir());
                self.nav.set_path(root);
                None
            }
            NavAction::GoIntoDir => {
                self.handle_go_into_dir();
                None
            }
            NavAction::GoUp => self.nav.move_up(len, rows),
            NavAction::GoDown => self.nav.move_down(len, rows),
            NavAction::GoToTop => self.nav.first_selected(len, rows),
            NavAction::GoToBottom => self.nav.last_selected(len, rows),
        };

        motion.map_or(KeypressResult::Continue, KeypressResult::Moved)
    }

    /// Handles actions on the selected entry. No-ops on an empty listing.
    fn handle_file_action(&mut self, action: FileAction) -> KeypressResult {
        let Some(entry) = self.selected_entry() else {
            return KeypressResult::Continue;
        };

        match action {
            FileAction::Edit => {
                let launch = Launch::new(
                    self.config.editor(),
                    Some(entry.name().to_os_string()),
                    self.nav.current_dir().to_path_buf(),
                );
                KeypressResult::Launch(launch)
            }
            FileAction::Delete => {
                let name = entry.name().to_os_string();
                let is_directory = entry.kind() == EntryKind::Directory;

                match self.snapshot.delete_by_name(&name, is_directory) {
                    Ok(()) => log::info!("deleted {}", name.to_string_lossy()),
                    Err(e) => {
                        log::warn!("cannot delete {}: {}", name.to_string_lossy(), e);
                        self.message =
                            Some(format!("cannot delete {}: {}", name.to_string_lossy(), e));
                    }
                }
                self.nav.mark_dirty();
                KeypressResult::Continue
            }
        }
    }

    fn handle_sys_action(&mut self, action: SystemAction) -> KeypressResult {
        match action {
            SystemAction::ToggleHidden => self.nav.toggle_hidden(),
            SystemAction::Refresh => self.nav.mark_dirty(),
            SystemAction::Shell => {
                let launch = Launch::new(
                    self.config.shell(),
                    None,
                    self.nav.current_dir().to_path_buf(),
                );
                return KeypressResult::Launch(launch);
            }
            SystemAction::Quit => return KeypressResult::Quit,
        }
        KeypressResult::Continue
    }

    /// Descends into the selected entry if it is a directory or a link to one.
    fn handle_go_into_dir(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        if !entry.is_dir_like() {
            return;
        }

        let name = entry.name().to_os_string();
        self.nav.go_into(&name);
    }
}

/// The filesystem root containing `path`.
fn root_of(path: &Path) -> PathBuf {
    path.ancestors()
        .last()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_of_absolute_path() {
        assert_eq!(root_of(Path::new("/home/user/projects")), Path::new("/"));
        assert_eq!(root_of(Path::new("/")), Path::new("/"));
    }

    #[test]
    fn unbound_key_keeps_message() {
        let config = Config::from_lookup(|_| None);
        let mut app = AppState::new(config, PathBuf::from("/"));
        app.message = Some("kept".into());

        assert_eq!(app.handle_keypress('Z'), KeypressResult::Continue);
        assert_eq!(app.message(), Some("kept"));

        app.handle_keypress('r');
        assert_eq!(app.message(), None);
    }

    #[test]
    fn file_actions_need_an_entry() {
        let config = Config::from_lookup(|_| None);
        let mut app = AppState::new(config, PathBuf::from("/path/does/not/exist"));
        app.rescan();

        assert_eq!(app.handle_keypress('e'), KeypressResult::Continue);
        assert_eq!(app.handle_keypress('x'), KeypressResult::Continue);
        assert!(!app.needs_rescan());
    }
}
