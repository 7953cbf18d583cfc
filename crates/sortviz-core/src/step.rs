#![forbid(unsafe_code)]

//! Visual steps emitted by the engine.
//!
//! A visual step is one unit of animation progress: a swap, a shift, or a
//! merge write. For each step the engine hands a [`StepSink`] the current
//! sequence and the [`IndexPair`] to highlight. The sink decides how to copy
//! and deliver it; the engine never shares the live sequence.

use std::sync::Arc;

/// Pair of positions highlighted for one step.
///
/// These are display hints recorded by the algorithms exactly as computed.
/// They may fall outside `0..len` (insertion sort records `-1` after the last
/// shift, merge records `k + i`), so renderers must range-check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexPair {
    pub a: isize,
    pub b: isize,
}

impl IndexPair {
    /// Highlights nothing. Used for completion and reset snapshots.
    pub const NONE: IndexPair = IndexPair { a: -1, b: -1 };

    #[must_use]
    pub const fn new(a: isize, b: isize) -> Self {
        Self { a, b }
    }

    /// Build a pair from in-range positions.
    #[must_use]
    pub fn at(a: usize, b: usize) -> Self {
        Self {
            a: to_signed(a),
            b: to_signed(b),
        }
    }

    /// Whether `index` is one of the highlighted positions.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        let index = to_signed(index);
        self.a == index || self.b == index
    }
}

fn to_signed(index: usize) -> isize {
    isize::try_from(index).unwrap_or(isize::MAX)
}

/// Immutable copy of the sequence at one visual step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Zero-based production index within the run.
    pub chunk: u64,
    pub values: Arc<[i32]>,
}

/// Receiver of visual steps.
///
/// Implementations must record `pair` and the snapshot together so the
/// number of pairs always equals the number of snapshots.
pub trait StepSink {
    /// Deliver one visual step.
    fn publish(&mut self, values: &[i32], pair: IndexPair);

    /// The run finished sorted. Called before the completion snapshot.
    fn mark_complete(&mut self);
}

impl<S: StepSink + ?Sized> StepSink for &mut S {
    fn publish(&mut self, values: &[i32], pair: IndexPair) {
        (**self).publish(values, pair);
    }

    fn mark_complete(&mut self) {
        (**self).mark_complete();
    }
}

impl<S: StepSink + ?Sized> StepSink for Box<S> {
    fn publish(&mut self, values: &[i32], pair: IndexPair) {
        (**self).publish(values, pair);
    }

    fn mark_complete(&mut self) {
        (**self).mark_complete();
    }
}

/// A sink that keeps every step, for inspection and replay.
#[derive(Debug, Default, Clone)]
pub struct StepRecorder {
    snapshots: Vec<Snapshot>,
    pairs: Vec<IndexPair>,
    complete: bool,
}

impl StepRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every snapshot, in production order.
    #[must_use]
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Every index pair, in production order.
    #[must_use]
    pub fn pairs(&self) -> &[IndexPair] {
        &self.pairs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// The most recent snapshot's values.
    #[must_use]
    pub fn last_values(&self) -> Option<&[i32]> {
        self.snapshots.last().map(|s| &*s.values)
    }
}

impl StepSink for StepRecorder {
    fn publish(&mut self, values: &[i32], pair: IndexPair) {
        let chunk = self.snapshots.len() as u64;
        self.snapshots.push(Snapshot {
            chunk,
            values: Arc::from(values),
        });
        self.pairs.push(pair);
    }

    fn mark_complete(&mut self) {
        self.complete = true;
    }
}
