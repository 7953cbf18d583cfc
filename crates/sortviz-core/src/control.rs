#![forbid(unsafe_code)]

//! Shared run state between the host thread and the sort worker.
//!
//! A [`RunControl`] is created by the host, wrapped in an `Arc`, and handed to
//! every engine it starts. The host writes the selection, the delay, and stop
//! requests; the engine writes the comparison counter, the completion flag,
//! and the run timestamps. Every field is atomic or mutex-guarded.
//!
//! # Generations
//!
//! Each time the selected algorithm changes, or a new run begins, the
//! generation counter advances. Recursive sorts capture the generation when
//! they start and stop as soon as the live value differs, so a stale
//! recursion never mutates the sequence after the host has moved on.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};

use web_time::{Duration, Instant};

use crate::algorithm::Algorithm;
use crate::cancellation::{CancellationSource, CancellationToken};

const NO_ALGORITHM: u8 = 0;

/// Start/stop timestamps of the current run.
#[derive(Debug, Default, Clone, Copy)]
struct RunClock {
    started: Option<Instant>,
    stopped: Option<Instant>,
}

/// Process-wide-per-run control state.
#[derive(Debug)]
pub struct RunControl {
    algorithm: AtomicU8,
    delay_ms: AtomicU64,
    stop: CancellationSource,
    generation: AtomicU64,
    comparisons: AtomicU64,
    complete: AtomicBool,
    clock: Mutex<RunClock>,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RunControl {
    /// Create control state with no algorithm selected and no delay.
    pub fn new() -> Self {
        Self {
            algorithm: AtomicU8::new(NO_ALGORITHM),
            delay_ms: AtomicU64::new(0),
            stop: CancellationSource::new(),
            generation: AtomicU64::new(0),
            comparisons: AtomicU64::new(0),
            complete: AtomicBool::new(false),
            clock: Mutex::new(RunClock::default()),
        }
    }

    /// Builder-style selection, for setup code.
    #[must_use]
    pub fn with_algorithm(self, algorithm: Algorithm) -> Self {
        self.select(algorithm);
        self
    }

    /// Builder-style delay, for setup code.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        self.set_delay(delay);
        self
    }

    // --- selection ----------------------------------------------------------

    /// Select an algorithm. Changing the selection advances the generation;
    /// re-selecting the current algorithm does not.
    pub fn select(&self, algorithm: Algorithm) {
        self.store_selection(algorithm.to_raw());
    }

    /// Select by display name. Unknown names clear the selection, so a
    /// subsequent run takes no action. Returns whether the name was known.
    pub fn select_named(&self, name: &str) -> bool {
        match Algorithm::from_name(name) {
            Some(algorithm) => {
                self.select(algorithm);
                true
            }
            None => {
                tracing::warn!(name, "unrecognized algorithm name; selection cleared");
                self.store_selection(NO_ALGORITHM);
                false
            }
        }
    }

    fn store_selection(&self, raw: u8) {
        let previous = self.algorithm.swap(raw, Ordering::AcqRel);
        if previous != raw {
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// The currently selected algorithm, if any.
    #[must_use]
    pub fn selected(&self) -> Option<Algorithm> {
        Algorithm::from_raw(self.algorithm.load(Ordering::Acquire))
    }

    /// The current scheduling generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    // --- pacing -------------------------------------------------------------

    /// Set the sleep between visual steps. Takes effect at the next step.
    pub fn set_delay(&self, delay: Duration) {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.delay_ms.store(ms, Ordering::Release);
    }

    /// The sleep between visual steps.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.load(Ordering::Acquire))
    }

    // --- stop requests ------------------------------------------------------

    /// Ask the running engine to stop at its next check point.
    pub fn request_stop(&self) {
        self.stop.cancel();
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// A token observing stop requests, for the engine.
    #[must_use]
    pub fn stop_token(&self) -> CancellationToken {
        self.stop.token()
    }

    /// Prepare for a fresh run: clear the stop request, zero the counters,
    /// drop the completion flag and the old timestamps, and advance the
    /// generation so any straggler from the previous run stands down.
    pub fn begin_run(&self) {
        self.stop.rearm();
        self.reset_counters();
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Zero the comparison counter and clear completion and timing.
    pub fn reset_counters(&self) {
        self.comparisons.store(0, Ordering::Release);
        self.complete.store(false, Ordering::Release);
        *self.clock.lock().unwrap_or_else(|e| e.into_inner()) = RunClock::default();
    }

    // --- metrics ------------------------------------------------------------

    /// Count one element-vs-element comparison.
    #[inline]
    pub fn record_comparison(&self) {
        self.comparisons.fetch_add(1, Ordering::AcqRel);
    }

    /// Comparisons made so far in this run.
    #[must_use]
    pub fn comparisons(&self) -> u64 {
        self.comparisons.load(Ordering::Acquire)
    }

    /// Mark the run as sorted.
    pub fn mark_complete(&self) {
        self.complete.store(true, Ordering::Release);
    }

    /// Whether the last run finished sorted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    /// Record the start of a sorting run.
    pub fn mark_started(&self) {
        let mut clock = self.clock.lock().unwrap_or_else(|e| e.into_inner());
        clock.started = Some(Instant::now());
        clock.stopped = None;
    }

    /// Record the end of a sorting run.
    pub fn mark_stopped(&self) {
        let mut clock = self.clock.lock().unwrap_or_else(|e| e.into_inner());
        if clock.started.is_some() {
            clock.stopped = Some(Instant::now());
        }
    }

    /// When the current run started, if it has.
    #[must_use]
    pub fn started_at(&self) -> Option<Instant> {
        self.clock.lock().unwrap_or_else(|e| e.into_inner()).started
    }

    /// Time since the run started, frozen once it stops. Zero before a run.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        let clock = *self.clock.lock().unwrap_or_else(|e| e.into_inner());
        match (clock.started, clock.stopped) {
            (Some(start), Some(stop)) => stop.saturating_duration_since(start),
            (Some(start), None) => start.elapsed(),
            (None, _) => Duration::ZERO,
        }
    }
}
