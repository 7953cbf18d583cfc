#![forbid(unsafe_code)]

//! sortviz runtime
//!
//! Ties the sort engine to a host that redraws on its own schedule.
//!
//! # Key Components
//!
//! - [`Session`] - Start/reset/select/delay controller a UI talks to
//! - [`SortWorker`] - The background thread that owns the sequence during a run
//! - [`frame_channel`] - Single-slot snapshot mailbox plus ordered index-pair log
//! - [`FrameSink`] - Drains the mailbox and hands out at most one [`Frame`]
//!   per cycle, keeping its chunk counter in lockstep with the log
//! - [`Renderer`] - Trait the host implements to draw a frame
//! - [`VizConfig`] - TOML/JSON run configuration
//!
//! # How it fits in the system
//! `sortviz-core` produces visual steps on whichever thread runs it. This
//! crate runs it on exactly one worker thread and lets the host thread pull
//! frames at display cadence; the two threads share only the run control
//! atomics and the mailbox lock.

pub mod config;
pub mod error;
pub mod frame_sink;
pub mod mailbox;
pub mod sequence;
pub mod session;
pub mod worker;

pub use config::{MAX_LEN, RenderSection, RunSection, SequenceSection, VizConfig};
pub use error::{Result, SortvizError};
pub use frame_sink::{Frame, FrameSink, Renderer, SinkStats};
pub use mailbox::{Publisher, frame_channel};
pub use session::{RunStats, Session};
pub use worker::{SortWorker, WorkerOutput};
