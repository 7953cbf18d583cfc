#![forbid(unsafe_code)]

//! The `run` command: shuffle, animate one sort, print a summary.

use std::fmt;
use std::io::Write;
use std::thread;

use sortviz_core::{Algorithm, RunOutcome};
use sortviz_runtime::{Renderer, Session, VizConfig};
use web_time::{Duration, Instant};

use crate::error::Result;
use crate::render::{BarRenderer, format_elapsed};

/// What a finished animation reports back to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub algorithm: Option<Algorithm>,
    pub outcome: RunOutcome,
    pub comparisons: u64,
    pub steps: u64,
    pub elapsed: Duration,
    pub frames_drawn: u64,
    pub frames_dropped: u64,
    pub values: Vec<i32>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.algorithm.map_or("no algorithm", Algorithm::name);
        write!(
            f,
            "{name}: {} after {} comparisons, {} steps in {} ({} frames drawn, {} coalesced)",
            self.outcome,
            self.comparisons,
            self.steps,
            format_elapsed(self.elapsed),
            self.frames_drawn,
            self.frames_dropped,
        )
    }
}

/// Animation options that only make sense for a single shell invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimateOptions {
    /// Request a stop this long after the sort starts.
    pub cancel_after: Option<Duration>,
    /// Chart height; `None` keeps the renderer default.
    pub rows: Option<usize>,
}

/// Run one animation to completion, drawing into `out`.
///
/// Shows the freshly shuffled bars first, then starts the configured sort
/// and redraws at most once per frame interval until the worker returns.
pub fn animate<W: Write>(
    config: &VizConfig,
    options: AnimateOptions,
    out: W,
) -> Result<RunSummary> {
    let mut renderer = BarRenderer::new(out).with_clear_screen(config.render.clear_screen);
    if let Some(rows) = options.rows {
        renderer = renderer.with_rows(rows);
    }
    renderer.set_title(config.run.algorithm.clone());

    let mut session = Session::new(config);
    session.reset()?;
    session.wait()?;
    renderer.set_stats(session.stats());
    session.pump(&mut renderer)?;

    session.start()?;
    let started = Instant::now();
    let interval = config.frame_interval();
    let mut stop_sent = false;

    while session.is_running() {
        renderer.set_stats(session.stats());
        session.pump(&mut renderer)?;
        if let Some(limit) = options.cancel_after
            && !stop_sent
            && started.elapsed() >= limit
        {
            tracing::info!(
                after_ms = limit.as_millis() as u64,
                "cancel deadline reached; requesting stop"
            );
            session.request_stop();
            stop_sent = true;
        }
        thread::sleep(interval);
    }

    let report = session.wait()?;
    renderer.set_stats(session.stats());
    if !session.pump(&mut renderer)?
        && let Some(frame) = session.sink().last_frame().cloned()
    {
        // Nothing new since the last cycle; repaint so the status line is final.
        renderer.redraw(&frame)?;
    }

    let stats = session.stats();
    let (algorithm, outcome, steps, elapsed) = match report {
        Some(report) => (report.algorithm, report.outcome, report.steps, report.elapsed),
        None => (config.algorithm(), RunOutcome::Idle, 0, Duration::ZERO),
    };
    Ok(RunSummary {
        algorithm,
        outcome,
        comparisons: stats.comparisons,
        steps,
        elapsed,
        frames_drawn: stats.sink.frames_drawn,
        frames_dropped: stats.sink.frames_dropped,
        values: session.values().map(<[i32]>::to_vec).unwrap_or_default(),
    })
}
