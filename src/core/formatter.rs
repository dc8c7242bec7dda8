//! Sorting and display formatting for directory entries in filet.
//!
//! [sort_entries] implements the single ordering policy of a listing:
//! directory-like entries first, then everything else, each group by name.
//!
//! [sanitize_to_width] prepares names and paths for a terminal with line
//! wrapping disabled.

use crate::core::DirEntry;

use unicode_width::UnicodeWidthChar;

use std::borrow::Cow;
use std::cmp::Ordering;

/// Sorts the given entries in place.
///
/// Names are compared bytewise, so uppercase sorts before lowercase and dotfiles
/// sort before letters. Names are unique within one directory, which makes an
/// unstable sort deterministic.
pub fn sort_entries(entries: &mut [DirEntry]) {
    entries.sort_unstable_by(compare_entries);
}

fn compare_entries(a: &DirEntry, b: &DirEntry) -> Ordering {
    match (a.is_dir_like(), b.is_dir_like()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name().cmp(b.name()),
    }
}

/// Cleans a line for the terminal and cuts it to at most `max_width` columns.
///
/// Control characters (including tabs and newlines, which are legal in file
/// names) are replaced with `?` so one entry never spans more than one row.
/// Borrows the input when nothing had to change.
pub fn sanitize_to_width(line: &str, max_width: usize) -> Cow<'_, str> {
    let mut width = 0;
    let mut clean = true;

    for (idx, c) in line.char_indices() {
        let w = if c.is_control() {
            clean = false;
            1
        } else {
            c.width().unwrap_or(0)
        };

        if width + w > max_width {
            return Cow::Owned(replace_controls(&line[..idx]));
        }
        width += w;
    }

    if clean {
        Cow::Borrowed(line)
    } else {
        Cow::Owned(replace_controls(line))
    }
}

fn replace_controls(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect()
}
