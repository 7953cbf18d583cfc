#![forbid(unsafe_code)]

//! sortviz core
//!
//! The sorting side of the animation pipeline: the algorithms, the shared
//! run state they consult, and the step stream they emit.
//!
//! # Key Components
//!
//! - [`SortEngine`] - Runs one algorithm over an owned sequence, emitting a
//!   snapshot per visual step and pacing itself between steps
//! - [`RunControl`] - Selection, delay, stop flag, generation, and metrics
//!   shared between the host and the worker
//! - [`CancellationSource`] / [`CancellationToken`] - Cooperative stop
//!   requests with an interruptible wait
//! - [`StepSink`] - Where visual steps go; [`StepRecorder`] keeps them all
//!
//! # How it fits in the system
//! `sortviz-runtime` wraps the engine in a worker thread and feeds its steps
//! into a coalescing frame pipeline. This crate has no threads of its own;
//! everything here runs on whichever thread calls [`SortEngine::run`].

pub mod algorithm;
pub mod cancellation;
pub mod control;
pub mod engine;
pub mod step;

pub use algorithm::{Algorithm, ParseAlgorithmError};
pub use cancellation::{CancellationSource, CancellationToken};
pub use control::RunControl;
pub use engine::{EngineReport, RunOutcome, SortEngine};
pub use step::{IndexPair, Snapshot, StepRecorder, StepSink};
