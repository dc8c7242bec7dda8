//! Key mapping for filet.
//!
//! Every command is a single unmodified character. The table is fixed at
//! compile time; [action_for] looks a key up and [KEYBINDS] describes the
//! same table for `--help`.

use phf::phf_map;

/// Represents any action in the app: navigation, file, or system.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Nav(NavAction),
    File(FileAction),
    System(SystemAction),
}

/// Navigation actions: change the path or move the selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    GoParent,
    GoHome,
    GoRoot,
    GoIntoDir,
    GoUp,
    GoDown,
    GoToTop,
    GoToBottom,
}

/// Actions on the selected entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileAction {
    Edit,
    Delete,
}

/// Everything else.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SystemAction {
    ToggleHidden,
    Refresh,
    Shell,
    Quit,
}

use FileAction as F;
use NavAction as N;
use SystemAction as S;

static KEYMAP: phf::Map<char, Action> = phf_map! {
    'h' => Action::Nav(N::GoParent),
    '~' => Action::Nav(N::GoHome),
    '/' => Action::Nav(N::GoRoot),
    'l' => Action::Nav(N::GoIntoDir),
    'k' => Action::Nav(N::GoUp),
    'j' => Action::Nav(N::GoDown),
    'g' => Action::Nav(N::GoToTop),
    'G' => Action::Nav(N::GoToBottom),
    'e' => Action::File(F::Edit),
    'x' => Action::File(F::Delete),
    '.' => Action::System(S::ToggleHidden),
    'r' => Action::System(S::Refresh),
    's' => Action::System(S::Shell),
    'q' => Action::System(S::Quit),
};

/// Key bindings in display order, as shown by `--help`.
#[rustfmt::skip]
pub const KEYBINDS: &[(char, &str)] = &[
    ('j', "move selection down"),
    ('k', "move selection up"),
    ('g', "jump to first entry"),
    ('G', "jump to last entry"),
    ('l', "enter selected directory"),
    ('h', "go to parent directory"),
    ('~', "go to home directory"),
    ('/', "go to root directory"),
    ('.', "toggle hidden files"),
    ('r', "refresh"),
    ('e', "open selected entry in $EDITOR"),
    ('s', "open $SHELL in current directory"),
    ('x', "delete selected entry"),
    ('q', "quit"),
];

/// Looks up the action bound to `c`.
#[inline]
pub fn action_for(c: char) -> Option<Action> {
    KEYMAP.get(&c).copied()
}
