#![forbid(unsafe_code)]

//! Single-slot snapshot mailbox with an ordered side log.
//!
//! The producer side ([`Publisher`]) overwrites one slot with the latest
//! snapshot and appends the step's [`IndexPair`] to a log. Both happen under
//! one lock, so at every observable point
//! `log.len() == snapshots produced`. The consumer side
//! ([`FrameSink`](crate::frame_sink::FrameSink)) walks the log in lockstep
//! with its own drawn counter and only ever reads the newest snapshot; older
//! snapshots are overwritten before anyone sees them.
//!
//! # Coalescing Rules
//!
//! - **Snapshots** are coalesced: if several arrive between drains, only the
//!   latest survives.
//! - **Index pairs** are never dropped or reordered.
//! - **Completion** is sticky for the lifetime of the channel.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use sortviz_core::{IndexPair, Snapshot, StepSink};

use crate::frame_sink::FrameSink;

/// State guarded by the mailbox lock.
#[derive(Debug, Default)]
pub(crate) struct MailboxState {
    pub(crate) latest: Option<Snapshot>,
    pub(crate) produced: u64,
    pub(crate) log: Vec<IndexPair>,
    pub(crate) complete: bool,
    pub(crate) closed: bool,
}

#[derive(Debug, Default)]
pub(crate) struct Shared {
    state: Mutex<MailboxState>,
    ready: Condvar,
}

impl Shared {
    pub(crate) fn lock(&self) -> MutexGuard<'_, MailboxState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn ready(&self) -> &Condvar {
        &self.ready
    }
}

/// Create a connected producer/consumer pair for one run.
pub fn frame_channel() -> (Publisher, FrameSink) {
    let shared = Arc::new(Shared::default());
    let publisher = Publisher {
        shared: Arc::clone(&shared),
    };
    (publisher, FrameSink::new(shared))
}

/// Producer half, handed to the engine as its [`StepSink`].
///
/// Dropping the publisher closes the channel and wakes a waiting sink.
#[derive(Debug)]
pub struct Publisher {
    shared: Arc<Shared>,
}

impl Publisher {
    /// Snapshots published so far.
    #[must_use]
    pub fn produced(&self) -> u64 {
        self.shared.lock().produced
    }
}

impl StepSink for Publisher {
    fn publish(&mut self, values: &[i32], pair: IndexPair) {
        let mut state = self.shared.lock();
        let chunk = state.produced;
        state.log.push(pair);
        state.latest = Some(Snapshot {
            chunk,
            values: Arc::from(values),
        });
        state.produced += 1;
        drop(state);
        self.shared.ready().notify_all();
    }

    fn mark_complete(&mut self) {
        self.shared.lock().complete = true;
    }
}

impl Drop for Publisher {
    fn drop(&mut self) {
        self.shared.lock().closed = true;
        self.shared.ready().notify_all();
    }
}
