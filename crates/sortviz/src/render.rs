#![forbid(unsafe_code)]

//! Plain-text bar chart renderer.
//!
//! Each bar is one column; its height is scaled to the tallest value so the
//! chart fits in a fixed number of rows. Bars named by the frame's highlight
//! pair use a lighter glyph. Below the bars sits one status line.

use std::fmt::Write as _;
use std::io::{self, Write};

use sortviz_runtime::{Frame, Renderer, RunStats};
use web_time::Duration;

const BAR: char = '█';
const HIGHLIGHT: char = '▒';
const BLANK: char = ' ';
const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// Default chart height in rows.
pub const DEFAULT_ROWS: usize = 20;

pub struct BarRenderer<W: Write> {
    out: W,
    rows: usize,
    clear_screen: bool,
    title: String,
    stats: Option<RunStats>,
}

impl<W: Write> BarRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            rows: DEFAULT_ROWS,
            clear_screen: true,
            title: String::new(),
            stats: None,
        }
    }

    #[must_use]
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = rows.max(1);
        self
    }

    #[must_use]
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Counters shown in the status line of the next redraw.
    pub fn set_stats(&mut self, stats: RunStats) {
        self.stats = Some(stats);
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render `frame` to text without writing it.
    #[must_use]
    pub fn compose(&self, frame: &Frame) -> String {
        let tallest = frame.values.iter().copied().max().unwrap_or(0).max(1);
        let rows = self.rows.min(tallest as usize);
        let mut text = String::with_capacity((frame.values.len() + 1) * (rows + 2));

        for row in (1..=rows).rev() {
            for (index, &value) in frame.values.iter().enumerate() {
                // Ceiling scale: any positive value shows at least one cell.
                let filled =
                    i64::from(value.max(0)) * rows as i64 > (row as i64 - 1) * i64::from(tallest);
                let glyph = match (filled, frame.is_highlighted(index)) {
                    (false, _) => BLANK,
                    (true, true) => HIGHLIGHT,
                    (true, false) => BAR,
                };
                text.push(glyph);
            }
            let trimmed = text.trim_end_matches(BLANK).len();
            text.truncate(trimmed);
            text.push('\n');
        }
        text.push_str(&self.status_line(frame));
        text.push('\n');
        text
    }

    fn status_line(&self, frame: &Frame) -> String {
        let mut line = String::new();
        if !self.title.is_empty() {
            let _ = write!(line, "{} | ", self.title);
        }
        if let Some(stats) = self.stats {
            let _ = write!(
                line,
                "comparisons: {} | elapsed: {} | ",
                stats.comparisons,
                format_elapsed(stats.elapsed)
            );
        }
        let _ = write!(line, "step {}", frame.chunk + 1);
        if frame.complete {
            line.push_str(" | sorted");
        }
        line
    }
}

impl<W: Write> Renderer for BarRenderer<W> {
    fn redraw(&mut self, frame: &Frame) -> io::Result<()> {
        let text = self.compose(frame);
        if self.clear_screen {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

impl<W: Write> std::fmt::Debug for BarRenderer<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarRenderer")
            .field("rows", &self.rows)
            .field("clear_screen", &self.clear_screen)
            .field("title", &self.title)
            .finish()
    }
}

/// Compact elapsed time: `0s`, `750ms`, `1.25s`, `2m03s`.
#[must_use]
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    if secs == 0 {
        if d.is_zero() {
            return "0s".to_string();
        }
        return format!("{}ms", d.as_millis());
    }
    if secs < 60 {
        let centis = d.subsec_millis() / 10;
        if centis == 0 {
            return format!("{secs}s");
        }
        let decimal = format!("{centis:02}");
        return format!("{secs}.{}s", decimal.trim_end_matches('0'));
    }
    format!("{}m{:02}s", secs / 60, secs % 60)
}
