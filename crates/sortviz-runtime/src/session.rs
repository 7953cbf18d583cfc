#![forbid(unsafe_code)]

//! Host-facing run controller.
//!
//! A [`Session`] is what a UI talks to. It owns the sequence between runs,
//! the shared [`RunControl`], the current worker, and the [`FrameSink`] of
//! the current run. Every start or reset gets a fresh frame channel, so the
//! drawn-chunk counter and the index-pair log always start together at zero.
//!
//! # Lifecycle
//!
//! ```text
//!  reset() ──► reset worker (one snapshot, one delay) ──► idle
//!  start() ──► sort worker ──► Sorted | Cancelled | Superseded ──► idle
//! ```
//!
//! `reset()` requests a stop, waits for the current worker, replaces the
//! sequence with a fresh shuffle, and runs the engine with the stop still
//! pending so it publishes the new bars. `start()` clears the stop flag,
//! zeroes the counters, and runs the selected algorithm. A reset worker that
//! is still holding its frame is joined by `start()`; only an active sort
//! makes `start()` a no-op.

use std::io;
use std::mem;
use std::sync::Arc;

use rand::rngs::SmallRng;
use sortviz_core::{Algorithm, EngineReport, RunControl, SortEngine};
use web_time::Duration;

use crate::config::VizConfig;
use crate::error::Result;
use crate::frame_sink::{Frame, FrameSink, Renderer, SinkStats};
use crate::mailbox::frame_channel;
use crate::sequence::{rng_from_seed, shuffled};
use crate::worker::{SortWorker, WorkerOutput};

/// What the current worker was launched to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Reset,
    Sort,
}

/// Everything a host shows next to the bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub comparisons: u64,
    pub elapsed: Duration,
    pub complete: bool,
    pub sink: SinkStats,
}

pub struct Session {
    control: Arc<RunControl>,
    values: Vec<i32>,
    len: usize,
    rng: SmallRng,
    sink: FrameSink,
    worker: Option<(SortWorker, RunKind)>,
    last_report: Option<EngineReport>,
}

impl Session {
    /// Build a session from configuration. The sequence starts shuffled but
    /// nothing is published until [`reset`](Self::reset) or
    /// [`start`](Self::start).
    pub fn new(config: &VizConfig) -> Self {
        let control = Arc::new(RunControl::new());
        control.select_named(&config.run.algorithm);
        control.set_delay(config.delay());
        let mut rng = rng_from_seed(config.sequence.seed);
        let values = shuffled(config.sequence.len, &mut rng);
        Self::assemble(control, values, rng)
    }

    /// Build a session around a caller-supplied sequence and control.
    pub fn with_values(values: Vec<i32>, control: Arc<RunControl>) -> Self {
        Self::assemble(control, values, rng_from_seed(None))
    }

    fn assemble(control: Arc<RunControl>, values: Vec<i32>, rng: SmallRng) -> Self {
        // Placeholder channel; replaced on the first launch.
        let (_, sink) = frame_channel();
        Self {
            control,
            len: values.len(),
            values,
            rng,
            sink,
            worker: None,
            last_report: None,
        }
    }

    #[must_use]
    pub fn control(&self) -> &Arc<RunControl> {
        &self.control
    }

    pub fn select(&self, algorithm: Algorithm) {
        self.control.select(algorithm);
    }

    /// Select by display name. Unknown names leave nothing selected.
    pub fn select_named(&self, name: &str) -> bool {
        self.control.select_named(name)
    }

    pub fn set_delay(&self, delay: Duration) {
        self.control.set_delay(delay);
    }

    /// Ask the current run to stop at its next check point. Does not wait.
    pub fn request_stop(&self) {
        self.control.request_stop();
    }

    /// Whether a worker is still executing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|(w, _)| !w.is_finished())
    }

    fn is_sorting(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|(w, kind)| *kind == RunKind::Sort && !w.is_finished())
    }

    /// Begin sorting the current sequence with the selected algorithm.
    ///
    /// A pending reset is waited out first. Returns `false` (and does
    /// nothing) while a sort is in progress.
    pub fn start(&mut self) -> Result<bool> {
        if self.is_sorting() {
            tracing::warn!("start ignored; a run is already in progress");
            return Ok(false);
        }
        self.wait()?;
        self.control.begin_run();
        tracing::info!(
            algorithm = ?self.control.selected(),
            len = self.values.len(),
            "session starting run"
        );
        self.launch(RunKind::Sort)?;
        Ok(true)
    }

    /// Stop any run, reshuffle, and publish the fresh bars.
    pub fn reset(&mut self) -> Result<()> {
        self.control.request_stop();
        self.wait()?;
        self.values = shuffled(self.len, &mut self.rng);
        self.control.reset_counters();
        tracing::info!(len = self.len, "session reset");
        // The stop flag is still set, so the engine takes its reset path.
        self.launch(RunKind::Reset)
    }

    /// Block until the current worker returns and reclaim the sequence.
    ///
    /// Returns the worker's report, or `None` when nothing was running.
    pub fn wait(&mut self) -> Result<Option<EngineReport>> {
        let Some((worker, _)) = self.worker.take() else {
            return Ok(None);
        };
        self.reclaim(worker.join()).map(Some)
    }

    /// Take the sequence back from a joined worker. A lost worker took the
    /// sequence with it, so a fresh shuffle of the same length replaces it.
    fn reclaim(&mut self, joined: Result<WorkerOutput>) -> Result<EngineReport> {
        match joined {
            Ok(output) => {
                self.values = output.values;
                self.last_report = Some(output.report.clone());
                Ok(output.report)
            }
            Err(error) => {
                tracing::warn!(len = self.len, %error, "worker lost the sequence; reshuffling");
                self.values = shuffled(self.len, &mut self.rng);
                Err(error)
            }
        }
    }

    fn launch(&mut self, kind: RunKind) -> Result<()> {
        let (publisher, sink) = frame_channel();
        self.sink = sink;
        let values = mem::take(&mut self.values);
        let engine = SortEngine::new(values, Arc::clone(&self.control), publisher);
        match SortWorker::spawn(engine) {
            Ok(worker) => {
                self.worker = Some((worker, kind));
                Ok(())
            }
            Err(error) => {
                self.values = shuffled(self.len, &mut self.rng);
                Err(error)
            }
        }
    }

    /// Drain the current run's frames and redraw at most once.
    pub fn pump<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> io::Result<bool> {
        self.sink.pump(renderer)
    }

    /// Drain without drawing.
    pub fn drain(&mut self) -> Option<Frame> {
        self.sink.drain()
    }

    #[must_use]
    pub fn sink(&self) -> &FrameSink {
        &self.sink
    }

    /// The sequence, when no worker holds it.
    #[must_use]
    pub fn values(&self) -> Option<&[i32]> {
        self.worker.is_none().then_some(self.values.as_slice())
    }

    /// Report of the most recently joined worker.
    #[must_use]
    pub fn last_report(&self) -> Option<&EngineReport> {
        self.last_report.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> RunStats {
        RunStats {
            comparisons: self.control.comparisons(),
            elapsed: self.control.elapsed(),
            complete: self.control.is_complete(),
            sink: self.sink.stats(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("len", &self.len)
            .field("selected", &self.control.selected())
            .field("running", &self.is_running())
            .finish()
    }
}
