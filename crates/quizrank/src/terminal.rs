//! Terminal display surface for `quizrank watch`.

use std::io::{self, Write};
use std::sync::Mutex;

use tracing::warn;

use quizrank_core::{BoardFrame, DisplaySurface, SchedulerPhase};

use crate::color;
use crate::table::{EMPTY_MESSAGE, TableFormatter};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// What was on screen after the last redraw.
#[derive(Debug, Clone, PartialEq)]
struct Drawn {
    phase: SchedulerPhase,
    loading: bool,
    last_error: Option<String>,
}

impl Drawn {
    fn of(frame: &BoardFrame) -> Self {
        Self {
            phase: frame.phase,
            loading: frame.loading,
            last_error: frame.last_error.clone(),
        }
    }
}

/// Redraws the board whenever the rows or the status line change.
///
/// Rows carry a movement column relative to the previous refresh. Silent
/// refreshes that return the same rows leave the screen alone.
pub struct TerminalSurface<W: Write + Send> {
    out: Mutex<W>,
    last: Mutex<Option<Drawn>>,
    clear: bool,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), true)
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W, clear: bool) -> Self {
        Self {
            out: Mutex::new(out),
            last: Mutex::new(None),
            clear,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn needs_redraw(&self, frame: &BoardFrame) -> bool {
        let mut last = self
            .last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let drawn = Drawn::of(frame);
        let redraw = frame.changed || last.as_ref() != Some(&drawn);
        *last = Some(drawn);
        redraw
    }
}

/// Full screen content for one frame.
pub fn compose(frame: &BoardFrame) -> String {
    let mut screen = String::new();

    if frame.loading && frame.is_empty() {
        screen.push_str(&color::muted("Loading leaderboard..."));
    } else if frame.is_empty() {
        screen.push_str(&color::bold(&frame.scope.label()));
        screen.push('\n');
        screen.push_str(EMPTY_MESSAGE);
    } else {
        screen.push_str(&TableFormatter::with_movement(&frame.rows).render(frame));
    }
    screen.push('\n');
    screen.push_str(&status_line(frame));
    screen.push('\n');
    screen
}

fn status_line(frame: &BoardFrame) -> String {
    let mut parts = vec![frame.phase.to_string()];
    if frame.loading {
        parts.push("refreshing...".to_string());
    }
    if let Some(at) = frame.refreshed_at {
        parts.push(format!("updated {}", at.format("%H:%M:%S")));
    }
    let line = color::muted(&parts.join(" · "));

    match &frame.last_error {
        Some(error) => format!(
            "{}  {}",
            line,
            color::warning(&format!("last refresh failed: {}", error))
        ),
        None => line,
    }
}

fn draw(out: &mut impl Write, frame: &BoardFrame, clear: bool) -> io::Result<()> {
    if clear {
        out.write_all(CLEAR_SCREEN.as_bytes())?;
    }
    out.write_all(compose(frame).as_bytes())?;
    out.flush()
}

impl<W: Write + Send> DisplaySurface for TerminalSurface<W> {
    fn render(&self, frame: &BoardFrame) {
        if !self.needs_redraw(frame) {
            return;
        }

        let mut out = self
            .out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = draw(&mut *out, frame, self.clear) {
            warn!(event = "cli.watch.render_failed", error = %e);
        }
    }
}
