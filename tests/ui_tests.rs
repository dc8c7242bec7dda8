//! UI-related tests for filet
//!
//! These tests render into an in-memory buffer instead of a terminal and check
//! the escape sequences and text that reach the screen: the full repaint after
//! a rescan and the two-line updates for selection changes.
//!
//! Temporary directories are created for the listings and removed afterwards.

use filet::app::{AppState, KeypressResult, Motion};
use filet::config::Config;
use filet::core::Geometry;
use filet::ui::render::{EMPTY_INDICATOR, SELECTION_MARKER, draw_full, draw_motion};

use std::error;
use std::fs::{self, File};
use std::path::Path;
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn error::Error>>;

fn app_at(path: &Path, geometry: Geometry) -> AppState {
    let config = Config::from_lookup(|key| match key {
        "USER" => Some("crab".into()),
        _ => None,
    });
    let mut app = AppState::new(config, path.to_path_buf());
    app.set_geometry(geometry);
    app.rescan();
    app
}

fn full(app: &AppState) -> Result<String, Box<dyn error::Error>> {
    let mut buf = Vec::new();
    draw_full(&mut buf, app)?;
    Ok(String::from_utf8(buf)?)
}

fn motion(app: &AppState, m: Motion) -> Result<String, Box<dyn error::Error>> {
    let mut buf = Vec::new();
    draw_motion(&mut buf, app, m)?;
    Ok(String::from_utf8(buf)?)
}

fn moved(result: KeypressResult) -> Result<Motion, Box<dyn error::Error>> {
    match result {
        KeypressResult::Moved(m) => Ok(m),
        other => Err(format!("expected a motion, got {:?}", other).into()),
    }
}

/// Escape sequence for moving to the 1-based `row`, column 1.
fn goto(row: u16) -> String {
    format!("\x1b[{};1H", row)
}

#[test]
fn test_full_redraw_lists_everything() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("A"))?;
    File::create(dir.path().join("b.txt"))?;

    let app = app_at(dir.path(), Geometry::new(24, 80));
    let out = full(&app)?;

    assert!(out.contains("\x1b[2J"), "screen not cleared");
    assert!(out.contains("crab@"), "user missing from status line");
    assert!(out.contains(&*dir.path().to_string_lossy()), "path missing");
    assert!(out.contains(&format!("{SELECTION_MARKER}A")));
    assert!(out.contains("  b.txt "));
    // cursor parked on the selection
    assert!(out.ends_with(&goto(3)), "{:?}", out);
    Ok(())
}

#[test]
fn test_entry_colors_by_kind() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("dir"))?;
    File::create(dir.path().join("plain"))?;

    let app = app_at(dir.path(), Geometry::new(24, 80));
    let out = full(&app)?;

    let dir_line = out.find(">  dir").ok_or("directory line missing")?;
    let blue = out[..dir_line].rfind("\x1b[38;5;4m").ok_or("directory not blue")?;
    assert!(dir_line - blue < 16, "blue must directly precede the directory line");

    let plain_line = out.find("  plain ").ok_or("plain line missing")?;
    let since_reset = &out[..plain_line];
    let reset = since_reset.rfind("\x1b[0m").ok_or("no reset before plain")?;
    assert!(!since_reset[reset..].contains("\x1b[38;5;"), "plain file must not be colored");
    Ok(())
}

#[test]
fn test_empty_directory_indicator() -> TestResult {
    let dir = tempdir()?;
    let app = app_at(dir.path(), Geometry::new(24, 80));

    let out = full(&app)?;
    assert!(out.contains(EMPTY_INDICATOR));
    assert!(!out.contains(SELECTION_MARKER));
    Ok(())
}

#[test]
fn test_unreadable_directory_indicator() -> TestResult {
    let app = app_at(Path::new("/path/does/not/exist"), Geometry::new(24, 80));

    let out = full(&app)?;
    assert!(out.contains("cannot read directory"));
    assert!(!out.contains(EMPTY_INDICATOR));
    Ok(())
}

#[test]
fn test_motion_redraws_two_lines() -> TestResult {
    let dir = tempdir()?;
    for name in ["a", "b", "c"] {
        File::create(dir.path().join(name))?;
    }

    let mut app = app_at(dir.path(), Geometry::new(24, 80));
    let m = moved(app.handle_keypress('j'))?;
    let out = motion(&app, m)?;

    assert!(!out.contains("\x1b[2J"), "local move must not clear the screen");
    assert!(out.contains("  a "));
    assert!(out.contains(">  b"));
    assert!(!out.contains("c"), "untouched line redrawn: {:?}", out);
    assert!(out.ends_with(&goto(4)));

    let m = moved(app.handle_keypress('k'))?;
    let out = motion(&app, m)?;
    assert!(out.contains(">  a"));
    assert!(out.contains("  b "));
    assert!(out.ends_with(&goto(3)));
    Ok(())
}

#[test]
fn test_bottom_jump_clamps_cursor_to_visible_rows() -> TestResult {
    let dir = tempdir()?;
    for i in 0..3 {
        File::create(dir.path().join(format!("f{i}")))?;
    }

    // short listing: cursor lands right after the last entry's row
    let mut app = app_at(dir.path(), Geometry::new(24, 80));
    let m = moved(app.handle_keypress('G'))?;
    assert!(motion(&app, m)?.ends_with(&goto(5)));

    for i in 3..40 {
        File::create(dir.path().join(format!("f{i:02}")))?;
    }

    // long listing: cursor clamped to the last screen row
    let mut app = app_at(dir.path(), Geometry::new(10, 80));
    let m = moved(app.handle_keypress('G'))?;
    assert!(m.scrolled());
    let out = motion(&app, m)?;
    assert!(out.ends_with(&goto(10)), "{:?}", out);
    Ok(())
}

#[test]
fn test_scrolling_past_the_edge_scrolls_region() -> TestResult {
    let dir = tempdir()?;
    for i in 0..10 {
        File::create(dir.path().join(format!("f{i}")))?;
    }

    // 3 list rows
    let mut app = app_at(dir.path(), Geometry::new(5, 80));
    moved(app.handle_keypress('j'))?;
    moved(app.handle_keypress('j'))?;

    let m = moved(app.handle_keypress('j'))?;
    let out = motion(&app, m)?;
    assert!(out.starts_with("\x1b[1S"), "{:?}", out);
    assert!(out.contains(">  f3"));

    moved(app.handle_keypress('k'))?;
    moved(app.handle_keypress('k'))?;
    let m = moved(app.handle_keypress('k'))?;
    let out = motion(&app, m)?;
    assert!(out.starts_with("\x1b[1T"), "{:?}", out);
    assert!(out.contains(">  f0"));
    Ok(())
}

#[test]
fn test_long_names_are_truncated() -> TestResult {
    let dir = tempdir()?;
    let long = "x".repeat(200);
    File::create(dir.path().join(&long))?;

    let app = app_at(dir.path(), Geometry::new(24, 20));
    let out = full(&app)?;

    assert!(out.contains(&format!(">  {}", "x".repeat(17))));
    assert!(!out.contains(&"x".repeat(18)));
    Ok(())
}

#[test]
fn test_message_line_shows_errors() -> TestResult {
    let dir = tempdir()?;
    fs::create_dir(dir.path().join("full"))?;
    File::create(dir.path().join("full").join("keep"))?;

    let mut app = app_at(dir.path(), Geometry::new(24, 80));
    app.handle_keypress('x');
    app.rescan();

    let out = full(&app)?;
    let msg_row = out.find(&goto(2)).ok_or("message row not drawn")?;
    let msg = out.find("cannot delete full").ok_or("message missing")?;
    assert!(msg > msg_row);
    Ok(())
}
