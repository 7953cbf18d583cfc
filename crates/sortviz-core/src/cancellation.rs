#![forbid(unsafe_code)]

//! Cooperative stop requests for sort runs.
//!
//! [`CancellationSource`] is held by the run controller; the engine receives a
//! [`CancellationToken`] and polls it at the top of every loop body and at
//! every recursive entry. Setting the flag never preempts the worker: a run
//! stops at its next check point.
//!
//! The token also backs the engine's pacing sleep. [`CancellationToken::wait_timeout`]
//! returns early when a stop is requested, so a slow animation delay does not
//! hold the worker after the host has asked it to stop.
//!
//! Unlike a one-shot signal, a source can be [`rearm`](CancellationSource::rearm)ed
//! when the next run begins.
//!
//! # Example
//!
//! ```
//! use sortviz_core::cancellation::CancellationSource;
//! use std::time::Duration;
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//!
//! let worker = std::thread::spawn(move || {
//!     let mut steps = 0u32;
//!     while !token.is_cancelled() {
//!         steps += 1;
//!         token.wait_timeout(Duration::from_millis(5));
//!     }
//!     steps
//! });
//!
//! source.cancel();
//! worker.join().unwrap();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use web_time::{Duration, Instant};

/// A thread-safe, cloneable view of a stop request.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<CancellationInner>,
}

/// The control handle that requests a stop.
///
/// Dropping the source does **not** cancel its tokens.
pub struct CancellationSource {
    inner: Arc<CancellationInner>,
}

struct CancellationInner {
    cancelled: AtomicBool,
    notify: (Mutex<()>, Condvar),
}

impl CancellationSource {
    /// Create a source whose tokens start uncancelled.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancellationInner {
                cancelled: AtomicBool::new(false),
                notify: (Mutex::new(()), Condvar::new()),
            }),
        }
    }

    /// Obtain a token observing this source.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Request a stop. Every token observes `is_cancelled() == true` and any
    /// pending `wait_timeout` wakes.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        let (lock, cvar) = &self.inner.notify;
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        cvar.notify_all();
    }

    /// Clear a previous stop request so the next run can proceed.
    ///
    /// Tokens handed out earlier observe the cleared state as well; callers
    /// make sure the previous worker has been joined first.
    pub fn rearm(&self) {
        self.inner.cancelled.store(false, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    /// Returns `true` if a stop has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Block until a stop is requested or the timeout elapses.
    ///
    /// Returns `true` if cancelled, `false` if the full duration passed.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        let (lock, cvar) = &self.inner.notify;
        let mut guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        let start = Instant::now();
        let mut remaining = duration;
        loop {
            if self.is_cancelled() {
                return true;
            }
            let (new_guard, result) = cvar
                .wait_timeout(guard, remaining)
                .unwrap_or_else(|e| e.into_inner());
            guard = new_guard;
            if self.is_cancelled() {
                return true;
            }
            if result.timed_out() {
                return false;
            }
            // Spurious wakeup: sleep for whatever is left.
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            remaining = duration - elapsed;
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl std::fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationSource")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
