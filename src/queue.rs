//! Single-slot hand-off between the input thread and a worker.

use std::sync::{Condvar, Mutex};

struct SlotState<T> {
    pending: Option<T>,
    closed: bool,
}

/// Latest-only queue: sending replaces whatever is still waiting.
///
/// A job the worker has already taken is never affected.
pub struct LatestOnlyQueue<T> {
    state: Mutex<SlotState<T>>,
    ready: Condvar,
}

impl<T> Default for LatestOnlyQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestOnlyQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                pending: None,
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Store `job`, returning the unstarted job it displaced.
    pub fn send(&self, job: T) -> Option<T> {
        let mut state = self.state.lock().expect("latest-only queue poisoned");
        let displaced = state.pending.replace(job);
        self.ready.notify_one();
        displaced
    }

    /// Wait for the next job; `None` once the queue is closed.
    pub fn take_blocking(&self) -> Option<T> {
        let mut state = self.state.lock().expect("latest-only queue poisoned");
        loop {
            if state.closed {
                return None;
            }
            if let Some(job) = state.pending.take() {
                return Some(job);
            }
            state = self.ready.wait(state).expect("latest-only queue poisoned");
        }
    }

    /// Drop any pending job and release the worker.
    pub fn close(&self) {
        let mut state = self.state.lock().expect("latest-only queue poisoned");
        state.closed = true;
        state.pending = None;
        self.ready.notify_all();
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        let state = self.state.lock().expect("latest-only queue poisoned");
        state.pending.is_some()
    }

    #[cfg(test)]
    pub(crate) fn try_take(&self) -> Option<T> {
        let mut state = self.state.lock().expect("latest-only queue poisoned");
        state.pending.take()
    }
}
