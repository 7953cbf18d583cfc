#![forbid(unsafe_code)]

//! Rate-decoupled consumer of engine snapshots.
//!
//! The engine can publish far faster than a host can redraw. A [`FrameSink`]
//! drains everything that arrived since the last drain, advancing its
//! "chunks drawn" counter once per item in production order, and yields a
//! single [`Frame`] built from the newest snapshot.
//!
//! The highlight for that frame is read from the index-pair log at the
//! counter position, never from the snapshot itself. Because the counter and
//! the log advance together, a frame's highlight always belongs to the
//! snapshot it shows, however many intermediate snapshots were skipped.

use std::io;
use std::sync::Arc;

use sortviz_core::IndexPair;
use web_time::{Duration, Instant};

use crate::mailbox::{MailboxState, Shared};

/// One redraw request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub values: Arc<[i32]>,
    pub highlight: IndexPair,
    /// Zero-based chunk counter of the snapshot shown.
    pub chunk: u64,
    /// The run finished sorted.
    pub complete: bool,
}

impl Frame {
    /// Whether bar `index` should be drawn highlighted.
    #[must_use]
    pub fn is_highlighted(&self, index: usize) -> bool {
        !self.complete && self.highlight.contains(index)
    }
}

/// Host-side drawing surface.
pub trait Renderer {
    /// Draw one frame. Called at most once per drain cycle.
    fn redraw(&mut self, frame: &Frame) -> io::Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn redraw(&mut self, frame: &Frame) -> io::Result<()> {
        (**self).redraw(frame)
    }
}

/// Counters describing how much the sink coalesced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Snapshots consumed (drawn or skipped).
    pub chunks_consumed: u64,
    /// Frames actually handed out.
    pub frames_drawn: u64,
    /// Snapshots skipped because a newer one was already queued.
    pub frames_dropped: u64,
}

/// Consumer half of a [`frame_channel`](crate::mailbox::frame_channel).
#[derive(Debug)]
pub struct FrameSink {
    shared: Arc<Shared>,
    chunks_drawn: u64,
    frames_drawn: u64,
    last: Option<Frame>,
}

impl FrameSink {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self {
            shared,
            chunks_drawn: 0,
            frames_drawn: 0,
            last: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }

    /// Consume everything queued and return the newest frame, if any arrived
    /// since the last drain. Never blocks on the producer beyond the lock.
    pub fn drain(&mut self) -> Option<Frame> {
        let shared = Arc::clone(&self.shared);
        let state = shared.lock();
        self.drain_locked(&state)
    }

    /// Wait up to `timeout` for at least one new snapshot, then drain.
    ///
    /// Returns `None` on timeout or when the producer has gone away with
    /// nothing left to drain. A timeout too large to represent waits without
    /// a deadline.
    pub fn wait_frame(&mut self, timeout: Duration) -> Option<Frame> {
        let shared = Arc::clone(&self.shared);
        let deadline = Instant::now().checked_add(timeout);
        let mut state = shared.lock();
        while state.produced == self.chunks_drawn && !state.closed {
            state = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return None;
                    }
                    shared
                        .ready()
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(|e| e.into_inner())
                        .0
                }
                None => shared.ready().wait(state).unwrap_or_else(|e| e.into_inner()),
            };
        }
        self.drain_locked(&state)
    }

    /// Drain and, if anything new arrived, issue exactly one redraw.
    ///
    /// Returns whether a redraw happened.
    pub fn pump<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> io::Result<bool> {
        match self.drain() {
            Some(frame) => {
                renderer.redraw(&frame)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn drain_locked(&mut self, state: &MailboxState) -> Option<Frame> {
        if state.produced == self.chunks_drawn {
            return None;
        }
        let pending = state.produced - self.chunks_drawn;

        // Walk the log once per queued item so the counter never skips.
        let mut highlight = IndexPair::NONE;
        while self.chunks_drawn < state.produced {
            highlight = state.log[self.chunks_drawn as usize];
            self.chunks_drawn += 1;
        }
        let chunk = self.chunks_drawn - 1;

        let snapshot = state.latest.as_ref()?;
        debug_assert_eq!(snapshot.chunk, chunk, "mailbox slot out of step with log");

        if pending > 1 {
            tracing::trace!(pending, chunk, "coalesced snapshots into one frame");
        }

        let frame = Frame {
            values: Arc::clone(&snapshot.values),
            highlight,
            chunk,
            complete: state.complete,
        };
        self.frames_drawn += 1;
        self.last = Some(frame.clone());
        Some(frame)
    }

    /// The most recently drained frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last.as_ref()
    }

    /// Chunks consumed so far; equals the log position of the next frame.
    #[must_use]
    pub fn chunks_drawn(&self) -> u64 {
        self.chunks_drawn
    }

    /// The index pair logged for `chunk`, if it has been produced.
    #[must_use]
    pub fn highlight_at(&self, chunk: u64) -> Option<IndexPair> {
        let index = usize::try_from(chunk).ok()?;
        self.shared.lock().log.get(index).copied()
    }

    /// Entries in the index-pair log.
    #[must_use]
    pub fn log_len(&self) -> usize {
        self.shared.lock().log.len()
    }

    /// Snapshots the producer has published.
    #[must_use]
    pub fn produced(&self) -> u64 {
        self.shared.lock().produced
    }

    /// Whether the producer marked the run complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.shared.lock().complete
    }

    /// The producer is gone and every snapshot has been consumed.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        let state = self.shared.lock();
        state.closed && state.produced == self.chunks_drawn
    }

    #[must_use]
    pub fn stats(&self) -> SinkStats {
        SinkStats {
            chunks_consumed: self.chunks_drawn,
            frames_drawn: self.frames_drawn,
            frames_dropped: self.chunks_drawn - self.frames_drawn,
        }
    }
}
