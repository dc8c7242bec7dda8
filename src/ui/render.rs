//! Screen drawing for filet.
//!
//! Two entry points are used by the terminal loop:
//! - [draw_full] repaints everything after a rescan or resize.
//! - [draw_motion] repaints only what a selection change touched.
//!
//! Both only queue crossterm commands into the writer; the loop flushes once per
//! event. This module reads state and never changes it.

use crate::app::{AppState, Motion};
use crate::core::terminal::STATUS_ROWS;
use crate::core::{DirEntry, EntryKind, sanitize_to_width};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType, ScrollDown, ScrollUp},
};
use unicode_width::UnicodeWidthStr;

use std::io::{self, Write};

/// Marker printed in front of the selected entry.
pub const SELECTION_MARKER: &str = ">  ";
/// Indent of every other entry. One column shorter than the marker; the
/// trailing space after the name makes up for it when a line is deselected.
pub const ENTRY_INDENT: &str = "  ";

/// Text shown instead of the list for a directory without entries.
pub const EMPTY_INDICATOR: &str = "directory empty";

/// Repaints the whole screen: status line, message line and list.
pub fn draw_full<W: Write>(out: &mut W, app: &AppState) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        Clear(ClearType::All),
        MoveTo(0, 0)
    )?;
    draw_status(out, app)?;
    draw_message(out, app)?;
    draw_list(out, app)
}

/// Redraws the lines a [Motion] changed, scrolling the list region by one
/// line when the selection walked off its edge.
pub fn draw_motion<W: Write>(out: &mut W, app: &AppState, motion: Motion) -> io::Result<()> {
    if motion.scrolled() {
        match motion.new_offset as isize - motion.old_offset as isize {
            1 => queue!(out, ScrollUp(1))?,
            -1 => queue!(out, ScrollDown(1))?,
            _ => return draw_list(out, app),
        }
    }

    let rows = app.geometry().list_rows();
    let nav = app.nav();

    if let (Some(entry), Some(row)) = (app.entries().get(motion.from), nav.visible_row(motion.from, rows)) {
        draw_line(out, app, entry, false, row)?;
    }
    if let (Some(entry), Some(row)) = (app.entries().get(motion.to), nav.visible_row(motion.to, rows)) {
        draw_line(out, app, entry, true, row)?;
    }

    move_to_selection(out, app)
}

/// Status line: `user@host:` followed by the current path.
fn draw_status<W: Write>(out: &mut W, app: &AppState) -> io::Result<()> {
    let width = usize::from(app.geometry().columns);
    let config = app.config();

    let user_host = format!("{}@{}", config.user(), config.host());
    let user_host = sanitize_to_width(&user_host, width);
    let remaining = width.saturating_sub(user_host.width());

    queue!(
        out,
        MoveTo(0, 0),
        SetForegroundColor(Color::DarkGreen),
        SetAttribute(Attribute::Bold),
        Print(&user_host),
        SetAttribute(Attribute::Reset),
    )?;

    if remaining == 0 {
        return Ok(());
    }

    let path = app.current_dir().to_string_lossy();
    let path = sanitize_to_width(&path, remaining - 1);
    queue!(
        out,
        Print(":"),
        SetForegroundColor(Color::DarkBlue),
        SetAttribute(Attribute::Bold),
        Print(&path),
        SetAttribute(Attribute::Reset),
    )
}

/// Second line: errors from launches or deletions, blank otherwise.
fn draw_message<W: Write>(out: &mut W, app: &AppState) -> io::Result<()> {
    queue!(out, MoveTo(0, 1), Clear(ClearType::CurrentLine))?;

    let Some(msg) = app.message() else {
        return Ok(());
    };

    let msg = sanitize_to_width(msg, usize::from(app.geometry().columns));
    queue!(
        out,
        SetForegroundColor(Color::DarkRed),
        SetAttribute(Attribute::Reverse),
        Print(&msg),
        SetAttribute(Attribute::Reset),
    )
}

/// Repaints every row of the list region from the current viewport.
fn draw_list<W: Write>(out: &mut W, app: &AppState) -> io::Result<()> {
    let rows = app.geometry().list_rows();
    let nav = app.nav();
    let entries = app.entries();

    for row in 0..rows {
        queue!(out, MoveTo(0, screen_row(row)), Clear(ClearType::CurrentLine))?;
    }

    if entries.is_empty() {
        return draw_empty(out, app);
    }

    for (idx, entry) in entries.iter().enumerate().skip(nav.offset()).take(rows) {
        draw_line(out, app, entry, idx == nav.selected_idx(), idx - nav.offset())?;
    }

    move_to_selection(out, app)
}

/// Indicator for a listing without entries. Says why when the directory could
/// not be read at all.
fn draw_empty<W: Write>(out: &mut W, app: &AppState) -> io::Result<()> {
    let text = match app.snapshot().error() {
        Some(e) => format!("cannot read directory: {}", e),
        None => EMPTY_INDICATOR.to_string(),
    };
    let text = sanitize_to_width(&text, usize::from(app.geometry().columns));

    queue!(
        out,
        MoveTo(0, screen_row(0)),
        SetForegroundColor(Color::DarkRed),
        SetAttribute(Attribute::Reverse),
        Print(&text),
        SetAttribute(Attribute::Reset),
        MoveTo(0, screen_row(0)),
    )
}

/// Draws a single entry on list row `row`, overwriting what was there.
///
/// A selected line is `>  name`, any other is `  name ` so both cover the same
/// columns.
fn draw_line<W: Write>(
    out: &mut W,
    app: &AppState,
    entry: &DirEntry,
    is_selected: bool,
    row: usize,
) -> io::Result<()> {
    let width = usize::from(app.geometry().columns).saturating_sub(SELECTION_MARKER.len());
    let name = entry.name_str();
    let name = sanitize_to_width(&name, width);

    queue!(out, MoveTo(0, screen_row(row)), SetAttribute(Attribute::Reset))?;
    if let Some(color) = kind_color(entry.kind()) {
        queue!(out, SetForegroundColor(color), SetAttribute(Attribute::Bold))?;
    }

    if is_selected {
        queue!(out, Print(SELECTION_MARKER), Print(&name))?;
    } else {
        queue!(out, Print(ENTRY_INDENT), Print(&name), Print(" "))?;
    }

    queue!(out, SetAttribute(Attribute::Reset))
}

fn move_to_selection<W: Write>(out: &mut W, app: &AppState) -> io::Result<()> {
    let rows = app.geometry().list_rows();
    let nav = app.nav();
    let row = nav.visible_row(nav.selected_idx(), rows).unwrap_or(0);
    queue!(out, MoveTo(0, screen_row(row)))
}

/// Color of an entry line, `None` for the terminal default.
pub fn kind_color(kind: EntryKind) -> Option<Color> {
    match kind {
        EntryKind::Directory => Some(Color::DarkBlue),
        EntryKind::Symlink | EntryKind::SymlinkToDirectory => Some(Color::DarkCyan),
        EntryKind::Executable => Some(Color::DarkGreen),
        EntryKind::Regular => None,
    }
}

/// Terminal row (0-based) of list row `row`.
#[inline]
fn screen_row(row: usize) -> u16 {
    u16::try_from(row)
        .unwrap_or(u16::MAX)
        .saturating_add(STATUS_ROWS)
}
