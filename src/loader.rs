//! Generation-guarded holder for the snapshot a view displays.
//!
//! A fetch takes a [`Ticket`] before suspending and settles it with its
//! result. If the view was invalidated in the meantime (torn down, or a
//! refetch was forced) the ticket is stale and the late result is dropped.
//! A ticket dropped without settling (its future was cancelled) frees the
//! slot for the next fetch. Readers only ever see a complete snapshot: the
//! previous one or the new one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Proof that a fetch was started at a given generation.
#[must_use = "dropping a ticket abandons the fetch"]
pub struct Ticket<'a, T> {
    slot: &'a Slot<T>,
    generation: u64,
    settled: bool,
}

impl<T> Ticket<'_, T> {
    /// Installs `value` if this ticket is still current. Returns whether it was applied.
    pub fn commit(mut self, value: T) -> bool {
        self.settled = true;
        let mut inner = self.slot.lock();
        if self.generation != inner.generation {
            debug!(
                ticket = self.generation,
                current = inner.generation,
                "Discarding stale result"
            );
            return false;
        }
        inner.current = Some(Arc::new(value));
        inner.pending = false;
        true
    }

    /// Ends a fetch that produced nothing to install.
    pub fn abandon(self) {}
}

impl<T> Drop for Ticket<'_, T> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.slot.lock();
        if self.generation == inner.generation {
            inner.pending = false;
        }
    }
}

#[derive(Debug)]
struct Inner<T> {
    generation: u64,
    pending: bool,
    current: Option<Arc<T>>,
}

#[derive(Debug)]
pub struct Slot<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Slot {
            inner: Mutex::new(Inner {
                generation: 0,
                pending: false,
                current: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a fetch, or returns `None` while another one is pending.
    pub fn begin(&self) -> Option<Ticket<'_, T>> {
        let mut inner = self.lock();
        if inner.pending {
            debug!(generation = inner.generation, "Fetch already pending");
            return None;
        }
        inner.pending = true;
        Some(Ticket {
            slot: self,
            generation: inner.generation,
            settled: false,
        })
    }

    /// Makes every outstanding ticket stale and allows a new fetch.
    pub fn invalidate(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.pending = false;
    }

    /// The latest committed snapshot.
    pub fn current(&self) -> Option<Arc<T>> {
        self.lock().current.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().pending
    }
}
