//! Wait/notify plumbing shared by the sender and receiver.

use std::sync::atomic::{fence, AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// One-waiter condition signal with a lock-free fast path.
///
/// The notifier only takes the mutex when a waiter has announced itself, so
/// an uncontended push or pop never touches a lock. Lost wakeups are ruled out
/// by the SeqCst fences: the waiter stores `waiting` then re-reads the ring,
/// the notifier publishes to the ring then reads `waiting`, and at least one of
/// the two must observe the other's store.
#[derive(Debug, Default)]
pub(crate) struct Signal {
    waiting: AtomicBool,
    lock: Mutex<()>,
    cond: Condvar,
}

impl Signal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Parks until notified, `timeout` elapses, or `ready()` already holds.
    ///
    /// Spurious returns are allowed; callers re-check their condition.
    pub(crate) fn wait_until<F>(&self, timeout: Duration, ready: F)
    where
        F: Fn() -> bool,
    {
        let guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.waiting.store(true, Ordering::SeqCst);
        fence(Ordering::SeqCst);

        if !ready() {
            let _ = self
                .cond
                .wait_timeout(guard, timeout)
                .unwrap_or_else(PoisonError::into_inner);
        }

        self.waiting.store(false, Ordering::Relaxed);
    }

    /// Wakes the waiter if there is one. Call after publishing to the ring.
    pub(crate) fn notify(&self) {
        fence(Ordering::SeqCst);
        if self.waiting.load(Ordering::SeqCst) {
            // Holding the lock orders this notify after the waiter's check.
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.cond.notify_one();
        }
    }
}

/// State shared by both halves of a blocking channel.
#[derive(Debug)]
pub(crate) struct Shared {
    /// Producer -> parked consumer: an item was published.
    pub(crate) data: Signal,
    /// Consumer -> parked producer: a slot was freed.
    pub(crate) space: Signal,
    closed: AtomicBool,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            data: Signal::new(),
            space: Signal::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Marks the channel closed and wakes whichever side is parked.
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.data.notify();
        self.space.notify();
    }

    #[inline]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
