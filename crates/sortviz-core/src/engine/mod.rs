#![forbid(unsafe_code)]

//! The instrumented sort engine.
//!
//! A [`SortEngine`] owns the sequence for the duration of one run. It reads
//! the selected algorithm from [`RunControl`], sorts in place, and reports
//! every visual step to its [`StepSink`], sleeping the configured delay after
//! each one.
//!
//! # Check points
//!
//! Every loop body and every recursive entry first checks the stop token.
//! Merge and quick sort also compare the generation captured at run start
//! with the live generation, and stand down when the host has switched
//! algorithms or started another run.
//!
//! # Reset runs
//!
//! If a stop is already requested when the engine is built, it does not
//! sort. [`SortEngine::run`] publishes one snapshot of the sequence as given
//! (the host has just reshuffled it), sleeps one delay, and returns
//! [`RunOutcome::Reset`] so the host prepares a fresh engine. The decision is
//! taken in [`SortEngine::new`], on the host thread; a stop that lands after
//! that is an ordinary cancellation seen at the first check point.

mod quadratic;
mod recursive;

use std::fmt;
use std::sync::Arc;

use web_time::Duration;

use crate::algorithm::Algorithm;
use crate::cancellation::CancellationToken;
use crate::control::RunControl;
use crate::step::{IndexPair, StepSink};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The algorithm finished and the completion snapshot was emitted.
    Sorted,
    /// A stop request was observed at a check point.
    Cancelled,
    /// A recursive sort saw the generation move on and stood down.
    Superseded,
    /// A stop was pending at invocation; one snapshot was emitted.
    Reset,
    /// No recognized algorithm was selected; nothing happened.
    Idle,
    /// The post-run scan found the sequence out of order.
    Unsorted,
}

impl RunOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sorted => "sorted",
            Self::Cancelled => "cancelled",
            Self::Superseded => "superseded",
            Self::Reset => "reset",
            Self::Idle => "idle",
            Self::Unsorted => "unsorted",
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one [`SortEngine::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineReport {
    pub algorithm: Option<Algorithm>,
    pub outcome: RunOutcome,
    /// Snapshots published, including completion or reset snapshots.
    pub steps: u64,
    pub comparisons: u64,
    pub elapsed: Duration,
}

/// Runs one algorithm over an owned sequence, emitting visual steps.
pub struct SortEngine<S> {
    values: Vec<i32>,
    control: Arc<RunControl>,
    stop: CancellationToken,
    sink: S,
    generation: u64,
    reset: bool,
    steps: u64,
    completed: bool,
}

impl<S: StepSink> SortEngine<S> {
    pub fn new(values: Vec<i32>, control: Arc<RunControl>, sink: S) -> Self {
        let stop = control.stop_token();
        let generation = control.generation();
        let reset = control.is_stop_requested();
        Self {
            values,
            control,
            stop,
            sink,
            generation,
            reset,
            steps: 0,
            completed: false,
        }
    }

    /// The sequence in its current state.
    #[must_use]
    pub fn values(&self) -> &[i32] {
        &self.values
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[must_use]
    pub fn control(&self) -> &Arc<RunControl> {
        &self.control
    }

    /// Give back the sequence and the sink.
    pub fn into_parts(self) -> (Vec<i32>, S) {
        (self.values, self.sink)
    }

    /// Whether this engine was built with a stop pending and will only
    /// publish the reset frame.
    #[must_use]
    pub fn is_reset(&self) -> bool {
        self.reset
    }

    /// Execute the selected algorithm (or the reset path) to its end.
    pub fn run(&mut self) -> EngineReport {
        self.steps = 0;
        self.completed = false;

        if self.reset {
            self.emit_reset_frame();
            return self.report(self.control.selected(), RunOutcome::Reset);
        }

        // Generation before selection: a switch in between reads as superseded.
        self.generation = self.control.generation();
        let Some(algorithm) = self.control.selected() else {
            tracing::warn!("no algorithm selected; run skipped");
            return self.report(None, RunOutcome::Idle);
        };

        let _span = tracing::debug_span!(
            "sort_run",
            algorithm = %algorithm,
            len = self.values.len(),
            generation = self.generation
        )
        .entered();
        tracing::info!(algorithm = %algorithm, len = self.values.len(), "sort run started");
        self.control.mark_started();

        match algorithm {
            Algorithm::Bubble => self.bubble_sort(),
            Algorithm::Insertion => self.insertion_sort(),
            Algorithm::Selection => self.selection_sort(),
            Algorithm::Merge => self.merge_sort_all(),
            Algorithm::Quick => self.quick_sort_all(),
        }

        self.control.mark_stopped();
        let outcome = self.classify();
        let report = self.report(Some(algorithm), outcome);
        tracing::info!(
            algorithm = %algorithm,
            outcome = %report.outcome,
            steps = report.steps,
            comparisons = report.comparisons,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "sort run finished"
        );
        report
    }

    fn classify(&self) -> RunOutcome {
        if self.completed {
            RunOutcome::Sorted
        } else if self.stop.is_cancelled() {
            RunOutcome::Cancelled
        } else if self.superseded() {
            RunOutcome::Superseded
        } else {
            tracing::error!(len = self.values.len(), "sequence failed the post-run order scan");
            RunOutcome::Unsorted
        }
    }

    fn report(&self, algorithm: Option<Algorithm>, outcome: RunOutcome) -> EngineReport {
        EngineReport {
            algorithm,
            outcome,
            steps: self.steps,
            comparisons: self.control.comparisons(),
            elapsed: self.control.elapsed(),
        }
    }

    fn emit_reset_frame(&mut self) {
        tracing::debug!(len = self.values.len(), "stop pending at start; publishing reset frame");
        self.sink.publish(&self.values, IndexPair::NONE);
        self.steps += 1;
        // The stop token is already set, so an interruptible wait would
        // return at once; the reset frame still holds for one full delay.
        let delay = self.control.delay();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    // --- check points -------------------------------------------------------

    #[inline]
    fn cancelled(&self) -> bool {
        self.stop.is_cancelled()
    }

    #[inline]
    fn superseded(&self) -> bool {
        self.control.generation() != self.generation
    }

    /// Check point for recursive sorts: not cancelled and still current.
    #[inline]
    fn live(&self) -> bool {
        !self.cancelled() && !self.superseded()
    }

    #[inline]
    fn count_comparison(&self) {
        self.control.record_comparison();
    }

    // --- emission -----------------------------------------------------------

    /// Publish the current sequence as one visual step, then pace.
    fn step(&mut self, pair: IndexPair) {
        self.sink.publish(&self.values, pair);
        self.steps += 1;
        self.pace();
    }

    fn pace(&self) {
        let delay = self.control.delay();
        if delay.is_zero() {
            return;
        }
        if self.stop.wait_timeout(delay) {
            // Not fatal: the next check point observes the stop.
            tracing::debug!(
                delay_ms = delay.as_millis() as u64,
                "pacing sleep interrupted by stop request"
            );
        }
    }

    /// Flag completion and emit the final snapshot.
    fn complete(&mut self) {
        self.completed = true;
        self.control.mark_complete();
        self.sink.mark_complete();
        self.step(IndexPair::NONE);
    }

    /// Completion rule for recursive sorts: a full order scan after the
    /// top-level call returns.
    fn complete_if_sorted(&mut self) {
        if self.live() && self.values.is_sorted() {
            self.complete();
        }
    }
}

#[cfg(test)]
mod tests;
