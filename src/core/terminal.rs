//! Terminal surface and event loop for filet.
//!
//! Handles setup/teardown of raw mode, alternate screen and scroll region,
//! tracks the terminal geometry, and feeds key and resize events to the app.
//!
//! Restoration runs exactly once per [Surface::enter] no matter which path
//! leaves the program: [Surface::leave], the `Drop` of [Surface], or the panic
//! hook installed in `main` calling [restore].

use crate::app::{AppState, KeypressResult};
use crate::core::proc::{self, Handoff};
use crate::error::{Error, Result};
use crate::ui::render;

use crossterm::{
    Command,
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind, KeyModifiers},
    queue,
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    },
};

use std::fmt;
use std::io::{self, IsTerminal, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while the terminal is in raw mode on the alternate screen.
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Number of rows above the list: the status line and the message line.
pub const STATUS_ROWS: u16 = 2;

/// Last known terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub rows: u16,
    pub columns: u16,
}

impl Geometry {
    pub fn new(rows: u16, columns: u16) -> Self {
        Self { rows, columns }
    }

    /// Rows available to the entry list. Never zero so a tiny terminal still
    /// has somewhere to put the selection.
    #[inline]
    pub fn list_rows(&self) -> usize {
        usize::from(self.rows.saturating_sub(STATUS_ROWS)).max(1)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(24, 80)
    }
}

/// DECSTBM: limits scrolling to rows `top..=bottom` (1-based).
#[derive(Debug, Clone, Copy)]
pub struct SetScrollRegion(pub u16, pub u16);

impl Command for SetScrollRegion {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "\x1b[{};{}r", self.0, self.1)
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Resets the scroll region to the whole screen.
#[derive(Debug, Clone, Copy)]
pub struct ResetScrollRegion;

impl Command for ResetScrollRegion {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[r")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Queues the scroll region covering the list rows for `geometry`.
pub fn queue_scroll_region<W: Write>(out: &mut W, geometry: Geometry) -> io::Result<()> {
    let top = STATUS_ROWS + 1;
    let bottom = geometry.rows.max(top);
    queue!(out, SetScrollRegion(top, bottom))
}

/// Queues everything that makes up the full-screen session after raw mode is on.
pub fn queue_enter<W: Write>(out: &mut W, geometry: Geometry) -> io::Result<()> {
    queue!(
        out,
        EnterAlternateScreen,
        DisableLineWrap,
        Hide,
        Clear(ClearType::All)
    )?;
    queue_scroll_region(out, geometry)
}

/// Queues the inverse of [queue_enter].
pub fn queue_leave<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(
        out,
        EnableLineWrap,
        Show,
        ResetScrollRegion,
        LeaveAlternateScreen
    )
}

/// Restores the terminal if a session is active. Safe to call any number of times.
///
/// Called by [Surface::leave], by `Drop`, and by the panic hook.
pub fn restore() -> io::Result<()> {
    if !ACTIVE.swap(false, Ordering::SeqCst) {
        return Ok(());
    }

    let raw = disable_raw_mode();
    let mut stdout = io::stdout();
    queue_leave(&mut stdout)?;
    stdout.flush()?;
    raw
}

/// Queries the terminal size as (rows, columns).
pub fn query_size() -> Result<Geometry> {
    let (columns, rows) = terminal::size().map_err(Error::Geometry)?;
    Ok(Geometry::new(rows, columns))
}

/// Owns the real terminal for the lifetime of the program.
///
/// Holds the output stream, the current geometry, and whether a resize arrived
/// that the redraw path has not handled yet.
pub struct Surface<W: Write = Stdout> {
    out: W,
    geometry: Geometry,
    resized: bool,
}

impl Surface {
    /// Checks that both standard streams are terminals and reads the initial size.
    pub fn open() -> Result<Self> {
        if !(io::stdin().is_terminal() && io::stdout().is_terminal()) {
            return Err(Error::NotATty);
        }

        let geometry = query_size()?;
        Ok(Self::with_writer(io::stdout(), geometry))
    }
}

impl<W: Write> Surface<W> {
    pub fn with_writer(out: W, geometry: Geometry) -> Self {
        Self {
            out,
            geometry,
            resized: false,
        }
    }

    // Accessors

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Enters raw mode and the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode().map_err(Error::Terminal)?;
        ACTIVE.store(true, Ordering::SeqCst);

        queue_enter(&mut self.out, self.geometry)?;
        self.out.flush()?;
        Ok(())
    }

    /// Restores the terminal to the state found at [Surface::enter].
    pub fn leave(&mut self) -> Result<()> {
        self.out.flush()?;
        restore().map_err(Error::Terminal)
    }

    /// Records a resize notification. Only stores the new size; any output that
    /// depends on it happens in [Surface::take_resize]'s caller.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.geometry = Geometry::new(rows, columns);
        self.resized = true;
    }

    /// Returns the new geometry once after one or more resizes, re-establishing
    /// the scroll region for it.
    pub fn take_resize(&mut self) -> Result<Option<Geometry>> {
        if !std::mem::take(&mut self.resized) {
            return Ok(None);
        }
        queue_scroll_region(&mut self.out, self.geometry)?;
        Ok(Some(self.geometry))
    }

    /// Takes a size read after the terminal was away, flagging a resize only
    /// when it changed.
    fn adopt_size(&mut self, geometry: Geometry) {
        if geometry != self.geometry {
            self.resize(geometry.columns, geometry.rows);
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Handoff for Surface<W> {
    fn suspend(&mut self) -> Result<()> {
        self.leave()
    }

    /// Re-enters the session, picking up any resize that happened meanwhile.
    fn resume(&mut self) -> Result<()> {
        self.adopt_size(query_size()?);
        self.enter()
    }
}

impl<W: Write> Drop for Surface<W> {
    fn drop(&mut self) {
        let _ = self.out.flush();
        let _ = restore();
    }
}

/// Enters the full-screen session and runs the main event loop.
///
/// Blocks until quit. Returns an error if terminal setup, teardown or
/// output fails. When the loop and the teardown both fail, the loop's error
/// is returned and the teardown's is logged.
pub fn run_terminal(app: &mut AppState, surface: &mut Surface) -> Result<()> {
    surface.enter()?;
    app.set_geometry(surface.geometry());

    let result = event_loop(app, surface);
    first_error(result, surface.leave())
}

/// Combines the loop's result with the teardown's, preferring the loop's error.
fn first_error(result: Result<()>, leave: Result<()>) -> Result<()> {
    match (result, leave) {
        (Err(e), Err(leave)) => {
            log::error!("terminal restore failed: {}", leave);
            Err(e)
        }
        (result, leave) => result.and(leave),
    }
}

/// Hands a pending resize to the app and repaints for it. With a rescan
/// pending, the next loop iteration repaints anyway.
fn apply_resize<W: Write>(app: &mut AppState, surface: &mut Surface<W>) -> Result<()> {
    if let Some(geometry) = surface.take_resize()? {
        app.set_geometry(geometry);
        if !app.needs_rescan() {
            render::draw_full(surface.out(), app)?;
        }
    }
    Ok(())
}

/// Main event loop of filet: reads one event at a time, dispatches keys to the
/// app, and redraws either the two affected lines or the whole screen.
fn event_loop(app: &mut AppState, surface: &mut Surface) -> Result<()> {
    loop {
        if app.needs_rescan() {
            app.rescan();
            render::draw_full(surface.out(), app)?;
        }

        surface.flush()?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                    continue;
                }
                let event::KeyCode::Char(c) = key.code else {
                    continue;
                };

                match app.handle_keypress(c) {
                    KeypressResult::Quit => break,
                    KeypressResult::Continue => {}
                    KeypressResult::Moved(motion) => {
                        render::draw_motion(surface.out(), app, motion)?;
                    }
                    KeypressResult::Launch(launch) => {
                        let outcome = proc::spawn(surface, &launch)?;
                        app.finish_launch(&launch, outcome);
                    }
                }
            }
            Event::Resize(columns, rows) => {
                log::debug!("resize to {}x{}", columns, rows);
                surface.resize(columns, rows);
            }
            _ => {}
        }

        apply_resize(app, surface)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs::File;
    use tempfile::tempdir;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn rendered<F>(f: F) -> Result<String>
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    #[test]
    fn list_rows_excludes_status_lines() {
        assert_eq!(Geometry::new(24, 80).list_rows(), 22);
        assert_eq!(Geometry::new(2, 80).list_rows(), 1);
        assert_eq!(Geometry::new(0, 0).list_rows(), 1);
    }

    #[test]
    fn enter_sequence_sets_up_session() -> Result<()> {
        let out = rendered(|w| queue_enter(w, Geometry::new(30, 100)))?;
        assert!(out.contains("\x1b[?1049h"), "alternate screen: {:?}", out);
        assert!(out.contains("\x1b[?7l"), "line wrap off: {:?}", out);
        assert!(out.contains("\x1b[?25l"), "cursor hidden: {:?}", out);
        assert!(out.contains("\x1b[2J"), "cleared: {:?}", out);
        assert!(out.ends_with("\x1b[3;30r"), "scroll region: {:?}", out);
        Ok(())
    }

    #[test]
    fn leave_sequence_undoes_session() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let out = rendered(|w| queue_leave(w))?;
        let wrap = out.find("\x1b[?7h").ok_or("line wrap not re-enabled")?;
        let screen = out
            .find("\x1b[?1049l")
            .ok_or("primary screen not restored")?;
        assert!(out.contains("\x1b[?25h"));
        assert!(out.contains("\x1b[r"));
        assert!(wrap < screen, "primary screen restored last: {:?}", out);
        Ok(())
    }

    #[test]
    fn scroll_region_never_inverted() -> Result<()> {
        let out = rendered(|w| queue_scroll_region(w, Geometry::new(1, 10)))?;
        assert_eq!(out, "\x1b[3;3r");
        Ok(())
    }

    #[test]
    fn restore_without_session_is_noop() {
        assert!(restore().is_ok());
    }

    #[test]
    fn loop_error_wins_over_teardown_error() {
        let loop_err = || Err(Error::NotATty);
        let leave_err = || Err(Error::Terminal(io::Error::other("restore")));

        assert!(matches!(first_error(loop_err(), leave_err()), Err(Error::NotATty)));
        assert!(matches!(first_error(Ok(()), leave_err()), Err(Error::Terminal(_))));
        assert!(matches!(first_error(loop_err(), Ok(())), Err(Error::NotATty)));
        assert!(first_error(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn resizes_are_taken_once() -> TestResult {
        let mut surface = Surface::with_writer(Vec::new(), Geometry::new(24, 80));
        assert_eq!(surface.take_resize()?, None);

        surface.resize(100, 30);
        surface.resize(120, 40);
        assert_eq!(surface.take_resize()?, Some(Geometry::new(40, 120)));
        let out = String::from_utf8(std::mem::take(surface.out()))?;
        assert!(out.ends_with("\x1b[3;40r"), "scroll region: {:?}", out);

        assert_eq!(surface.take_resize()?, None);
        assert!(surface.out().is_empty());
        Ok(())
    }

    #[test]
    fn adopted_size_flags_resize_only_on_change() -> TestResult {
        let mut surface = Surface::with_writer(Vec::new(), Geometry::new(24, 80));

        surface.adopt_size(Geometry::new(24, 80));
        assert_eq!(surface.take_resize()?, None);

        surface.adopt_size(Geometry::new(50, 80));
        assert_eq!(surface.take_resize()?, Some(Geometry::new(50, 80)));
        Ok(())
    }

    #[test]
    fn resize_repaints_without_rescan() -> TestResult {
        let dir = tempdir()?;
        File::create(dir.path().join("only"))?;

        let mut app = AppState::new(Config::from_lookup(|_| None), dir.path().to_path_buf());
        app.rescan();
        let mut surface = Surface::with_writer(Vec::new(), Geometry::new(24, 80));

        surface.resize(60, 12);
        apply_resize(&mut app, &mut surface)?;
        assert_eq!(app.geometry(), Geometry::new(12, 60));
        assert!(!app.needs_rescan());

        let out = String::from_utf8(std::mem::take(surface.out()))?;
        let region = out.find("\x1b[3;12r").ok_or("scroll region not re-emitted")?;
        let clear = out.find("\x1b[2J").ok_or("screen not repainted")?;
        assert!(region < clear);
        assert!(out.contains("only"));

        apply_resize(&mut app, &mut surface)?;
        assert!(surface.out().is_empty(), "repainted without a resize");
        Ok(())
    }

    #[test]
    fn resize_defers_to_pending_rescan() -> TestResult {
        let dir = tempdir()?;
        let mut app = AppState::new(Config::from_lookup(|_| None), dir.path().to_path_buf());
        let mut surface = Surface::with_writer(Vec::new(), Geometry::new(24, 80));

        surface.resize(80, 30);
        apply_resize(&mut app, &mut surface)?;
        assert!(app.needs_rescan());
        assert_eq!(app.geometry(), Geometry::new(30, 80));

        let out = String::from_utf8(std::mem::take(surface.out()))?;
        assert_eq!(out, "\x1b[3;30r");
        Ok(())
    }
}
