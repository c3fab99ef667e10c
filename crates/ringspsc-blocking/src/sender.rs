//! Blocking sender wrapping a ringspsc `Producer`.

use crate::config::WaitConfig;
use crate::error::{BlockingError, SendError};
use crate::signal::Shared;
use ringspsc_rs::{Backoff, Producer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Sending half of a blocking SPSC channel.
///
/// # Note
///
/// `BlockingSender` does NOT implement `Clone`; the ring underneath has
/// exactly one producer. Dropping the sender closes the channel: the
/// receiver drains what is left and then sees [`BlockingError::Closed`].
pub struct BlockingSender<T> {
    producer: Producer<T>,
    shared: Arc<Shared>,
    config: WaitConfig,
}

impl<T> BlockingSender<T> {
    pub(crate) fn new(producer: Producer<T>, shared: Arc<Shared>, config: WaitConfig) -> Self {
        Self {
            producer,
            shared,
            config,
        }
    }

    /// Attempts to send an item without blocking.
    ///
    /// Fails with `Full` or `Closed`; the item is returned either way.
    pub fn try_send(&mut self, item: T) -> Result<(), SendError<T>> {
        if self.shared.is_closed() {
            return Err(SendError::new(item, BlockingError::Closed));
        }

        match self.producer.push(item) {
            Ok(()) => {
                self.shared.data.notify();
                Ok(())
            }
            Err(item) => Err(SendError::new(item, BlockingError::Full)),
        }
    }

    /// Sends an item, waiting for space while the ring is full.
    ///
    /// Fails only with `Closed` once the receiver is gone.
    pub fn send(&mut self, item: T) -> Result<(), SendError<T>> {
        self.send_until(item, None)
    }

    /// Sends an item, waiting at most `timeout` for space.
    pub fn send_timeout(&mut self, item: T, timeout: Duration) -> Result<(), SendError<T>> {
        self.send_until(item, Some(Instant::now() + timeout))
    }

    fn send_until(&mut self, mut item: T, deadline: Option<Instant>) -> Result<(), SendError<T>> {
        let mut backoff = Backoff::with_limit(self.config.backoff_limit);

        loop {
            item = match self.try_send(item) {
                Ok(()) => return Ok(()),
                Err(SendError {
                    item,
                    kind: BlockingError::Full,
                }) => item,
                Err(err) => return Err(err),
            };

            let park = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        debug!(capacity = self.producer.capacity(), "send timed out on full ring");
                        return Err(SendError::new(item, BlockingError::Timeout));
                    }
                    (deadline - now).min(self.config.park_timeout)
                }
                None => self.config.park_timeout,
            };

            if self.config.spin_before_park && !backoff.is_completed() {
                backoff.snooze();
                continue;
            }

            trace!(?park, "ring full, parking sender");
            let producer = &self.producer;
            let shared = &self.shared;
            shared
                .space
                .wait_until(park, || !producer.is_full() || shared.is_closed());
        }
    }

    /// Returns true once the receiver has been dropped.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Approximate number of queued items (advisory).
    #[inline]
    pub fn len(&self) -> usize {
        self.producer.len()
    }

    /// Returns true if the ring appeared empty (advisory).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.producer.is_empty()
    }

    /// Returns the ring buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.producer.capacity()
    }
}

impl<T> Drop for BlockingSender<T> {
    fn drop(&mut self) {
        debug!(pending = self.producer.len(), "sender dropped, closing channel");
        self.shared.close();
    }
}
