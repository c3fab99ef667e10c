//! Blocking receiver wrapping a ringspsc `Consumer`.

use crate::config::WaitConfig;
use crate::error::BlockingError;
use crate::signal::Shared;
use ringspsc_rs::{Backoff, Consumer};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Receiving half of a blocking SPSC channel.
///
/// Items arrive in exactly the order they were sent. Dropping the receiver
/// closes the channel and any further send fails with
/// [`BlockingError::Closed`].
pub struct BlockingReceiver<T> {
    consumer: Consumer<T>,
    shared: Arc<Shared>,
    config: WaitConfig,
}

impl<T> BlockingReceiver<T> {
    pub(crate) fn new(consumer: Consumer<T>, shared: Arc<Shared>, config: WaitConfig) -> Self {
        Self {
            consumer,
            shared,
            config,
        }
    }

    /// Attempts to receive an item without blocking.
    ///
    /// Fails with `Empty` while the sender is alive, and with `Closed` once the
    /// sender is gone and every item it sent has been received.
    pub fn try_recv(&mut self) -> Result<T, BlockingError> {
        if let Some(item) = self.consumer.pop() {
            self.shared.space.notify();
            return Ok(item);
        }

        if self.shared.is_closed() {
            // The sender's last push happens-before its close; look once more.
            return match self.consumer.pop() {
                Some(item) => Ok(item),
                None => Err(BlockingError::Closed),
            };
        }

        Err(BlockingError::Empty)
    }

    /// Receives an item, waiting while the ring is empty.
    pub fn recv(&mut self) -> Result<T, BlockingError> {
        self.recv_until(None)
    }

    /// Receives an item, waiting at most `timeout`.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<T, BlockingError> {
        self.recv_until(Some(Instant::now() + timeout))
    }

    fn recv_until(&mut self, deadline: Option<Instant>) -> Result<T, BlockingError> {
        let mut backoff = Backoff::with_limit(self.config.backoff_limit);

        loop {
            match self.try_recv() {
                Err(BlockingError::Empty) => {}
                other => return other,
            }

            let park = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        debug!("recv timed out on empty ring");
                        return Err(BlockingError::Timeout);
                    }
                    (deadline - now).min(self.config.park_timeout)
                }
                None => self.config.park_timeout,
            };

            if self.config.spin_before_park && !backoff.is_completed() {
                backoff.snooze();
                continue;
            }

            trace!(?park, "ring empty, parking receiver");
            let consumer = &self.consumer;
            let shared = &self.shared;
            shared
                .data
                .wait_until(park, || !consumer.is_empty() || shared.is_closed());
        }
    }

    /// Blocking iterator that yields items until the channel is closed and drained.
    pub fn iter(&mut self) -> impl Iterator<Item = T> + '_ {
        std::iter::from_fn(move || self.recv().ok())
    }

    /// Returns true once the sender has been dropped.
    ///
    /// Items it sent before dropping may still be waiting in the ring.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Approximate number of queued items (advisory).
    #[inline]
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    /// Returns true if the ring appeared empty (advisory).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }

    /// Returns the ring buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.consumer.capacity()
    }
}

impl<T> Drop for BlockingReceiver<T> {
    fn drop(&mut self) {
        debug!(discarded = self.consumer.len(), "receiver dropped, closing channel");
        self.shared.close();
    }
}
