#![forbid(unsafe_code)]

//! The background thread that runs one engine.
//!
//! [`SortWorker::spawn`] moves a [`SortEngine`] onto a named thread. The
//! sequence travels with it and comes back through [`SortWorker::join`], so
//! the host never touches the live sequence while a run is in progress.
//!
//! Dropping a worker that has not been joined requests a stop and joins it.
//! A sorting engine's pacing sleep wakes on the stop request, so this is
//! prompt; a reset engine holds its frame for one full delay first.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use sortviz_core::{EngineReport, RunControl, SortEngine, StepSink};

use crate::error::{Result, SortvizError};

const THREAD_NAME: &str = "sortviz-engine";

/// What a finished worker hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutput {
    pub report: EngineReport,
    pub values: Vec<i32>,
}

pub struct SortWorker {
    handle: Option<JoinHandle<WorkerOutput>>,
    control: Arc<RunControl>,
}

impl SortWorker {
    /// Start `engine` on its own thread.
    pub fn spawn<S>(engine: SortEngine<S>) -> Result<Self>
    where
        S: StepSink + Send + 'static,
    {
        let control = Arc::clone(engine.control());
        let handle = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || {
                let mut engine = engine;
                let report = engine.run();
                let (values, _sink) = engine.into_parts();
                WorkerOutput { report, values }
            })?;
        Ok(Self {
            handle: Some(handle),
            control,
        })
    }

    /// Whether the engine has returned.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Wait for the engine to return.
    pub fn join(mut self) -> Result<WorkerOutput> {
        let handle = self.handle.take().ok_or(SortvizError::WorkerPanicked)?;
        handle.join().map_err(|_| {
            tracing::error!("sort worker thread panicked");
            SortvizError::WorkerPanicked
        })
    }

    /// Request a stop, then wait for the engine to return.
    pub fn stop_and_join(self) -> Result<WorkerOutput> {
        self.control.request_stop();
        self.join()
    }
}

impl Drop for SortWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.control.request_stop();
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for SortWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortWorker")
            .field("finished", &self.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortviz_core::{Algorithm, RunOutcome, StepRecorder};
    use web_time::{Duration, Instant};

    #[test]
    fn worker_returns_sorted_values() {
        let control = Arc::new(RunControl::new().with_algorithm(Algorithm::Merge));
        let engine = SortEngine::new(vec![4, 2, 3, 1], control, StepRecorder::new());
        let output = SortWorker::spawn(engine).unwrap().join().unwrap();
        assert_eq!(output.values, vec![1, 2, 3, 4]);
        assert_eq!(output.report.outcome, RunOutcome::Sorted);
    }

    #[test]
    fn worker_thread_is_named() {
        struct Capture(Arc<std::sync::Mutex<Option<String>>>);
        impl StepSink for Capture {
            fn publish(&mut self, _: &[i32], _: sortviz_core::IndexPair) {
                *self.0.lock().unwrap() = thread::current().name().map(str::to_string);
            }
            fn mark_complete(&mut self) {}
        }
        let name = Arc::new(std::sync::Mutex::new(None));
        let control = Arc::new(RunControl::new().with_algorithm(Algorithm::Bubble));
        let engine = SortEngine::new(vec![2, 1], control, Capture(Arc::clone(&name)));
        SortWorker::spawn(engine).unwrap().join().unwrap();
        assert_eq!(name.lock().unwrap().as_deref(), Some(THREAD_NAME));
    }

    #[test]
    fn stop_and_join_interrupts_slow_run() {
        let control = Arc::new(
            RunControl::new()
                .with_algorithm(Algorithm::Bubble)
                .with_delay(Duration::from_secs(30)),
        );
        let engine = SortEngine::new(vec![5, 4, 3, 2, 1], control, StepRecorder::new());
        let worker = SortWorker::spawn(engine).unwrap();
        thread::sleep(Duration::from_millis(20));

        let start = Instant::now();
        let output = worker.stop_and_join().unwrap();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(output.report.outcome, RunOutcome::Cancelled);
    }

    #[test]
    fn stop_before_thread_runs_is_a_cancellation() {
        let control = Arc::new(
            RunControl::new()
                .with_algorithm(Algorithm::Selection)
                .with_delay(Duration::from_secs(30)),
        );
        let engine = SortEngine::new(vec![3, 1, 2], Arc::clone(&control), StepRecorder::new());
        control.request_stop();
        let start = Instant::now();
        let output = SortWorker::spawn(engine).unwrap().join().unwrap();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(output.report.outcome, RunOutcome::Cancelled);
        assert_eq!(output.report.steps, 0);
    }

    #[test]
    fn drop_stops_the_run() {
        let control = Arc::new(
            RunControl::new()
                .with_algorithm(Algorithm::Quick)
                .with_delay(Duration::from_secs(30)),
        );
        let engine = SortEngine::new(vec![3, 1, 2], Arc::clone(&control), StepRecorder::new());
        let worker = SortWorker::spawn(engine).unwrap();
        let start = Instant::now();
        drop(worker);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(control.is_stop_requested());
    }
}
