//! Safe producer and consumer halves of a [`RingBuffer`].
//!
//! The ring's `push`/`pop` are `unsafe` because the SPSC contract cannot be
//! checked at runtime without the synchronization the ring exists to avoid.
//! These handles make the contract a type-level fact instead: each half is
//! unique (not `Clone`) and its data operations take `&mut self`, so at most
//! one thread can push and at most one thread can pop.

use crate::{Config, MetricsSnapshot, RingBuffer, RingError};
use std::fmt;
use std::sync::atomic::{fence, Ordering};
use std::sync::Arc;

/// Creates a validated producer/consumer pair from `config`.
///
/// # Example
///
/// ```
/// use ringspsc_rs::{channel, Config};
/// use std::thread;
///
/// let (mut tx, mut rx) = channel::<u64>(Config::new(1024, false)).unwrap();
///
/// let producer = thread::spawn(move || {
///     for i in 0..10_000u64 {
///         let mut item = i;
///         while let Err(back) = tx.push(item) {
///             item = back;
///             std::hint::spin_loop();
///         }
///     }
/// });
///
/// let mut expected = 0;
/// while expected < 10_000 {
///     if let Some(v) = rx.pop() {
///         assert_eq!(v, expected);
///         expected += 1;
///     }
/// }
/// producer.join().unwrap();
/// ```
pub fn channel<T>(config: Config) -> Result<(Producer<T>, Consumer<T>), RingError> {
    Ok(RingBuffer::new(config)?.split())
}

/// Creates a validated producer/consumer pair with `capacity` slots.
pub fn bounded<T>(capacity: usize) -> Result<(Producer<T>, Consumer<T>), RingError> {
    Ok(RingBuffer::with_capacity(capacity)?.split())
}

// -----------------------------------------------------------------------------
// PRODUCER
// -----------------------------------------------------------------------------

/// The writing half of an SPSC ring.
///
/// `Producer` is `Send` (when `T: Send`) but not `Clone`.
pub struct Producer<T> {
    ring: Arc<RingBuffer<T>>,
}

impl<T> Producer<T> {
    pub(crate) fn new(ring: Arc<RingBuffer<T>>) -> Self {
        Self { ring }
    }

    /// Enqueue one item, or hand it back in `Err` if the ring is full.
    ///
    /// # Example
    /// ```
    /// let (mut tx, _rx) = ringspsc_rs::bounded::<u8>(1).unwrap();
    /// assert!(tx.push(1).is_ok());
    /// // Ring is full, handle backpressure
    /// assert_eq!(tx.push(2), Err(2));
    /// ```
    #[inline]
    pub fn push(&mut self, item: T) -> Result<(), T> {
        // SAFETY: &mut self on the only Producer serializes all pushes.
        unsafe { self.ring.push(item) }
    }

    /// Batch send (convenience). Writes the longest prefix of `items` that
    /// fits and returns its length.
    #[inline]
    pub fn push_slice(&mut self, items: &[T]) -> usize
    where
        T: Copy,
    {
        // SAFETY: see push().
        unsafe { self.ring.push_slice(items) }
    }

    /// Returns the ring buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Approximate number of items in the ring (advisory).
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns true if the ring appeared empty (advisory).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns true if the ring appeared full (advisory).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Returns the raw `(head, tail)` cursor values (advisory).
    #[inline]
    pub fn cursors(&self) -> (usize, usize) {
        self.ring.cursors()
    }

    /// Returns true once the [`Consumer`] has been dropped.
    #[inline]
    pub fn is_abandoned(&self) -> bool {
        peer_dropped(&self.ring)
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.ring.metrics()
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").field("ring", &self.ring).finish()
    }
}

// -----------------------------------------------------------------------------
// CONSUMER
// -----------------------------------------------------------------------------

/// The reading half of an SPSC ring.
///
/// `Consumer` is `Send` (when `T: Send`) but not `Clone`.
pub struct Consumer<T> {
    ring: Arc<RingBuffer<T>>,
}

impl<T> Consumer<T> {
    pub(crate) fn new(ring: Arc<RingBuffer<T>>) -> Self {
        Self { ring }
    }

    /// Dequeue the oldest item, or `None` if the ring is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        // SAFETY: &mut self on the only Consumer serializes all pops.
        unsafe { self.ring.pop() }
    }

    /// Consume up to `max_items` with a single tail update.
    ///
    /// Useful when one large drain would hold the consumer too long.
    #[inline]
    pub fn consume_up_to<F>(&mut self, max_items: usize, handler: F) -> usize
    where
        F: FnMut(T),
    {
        // SAFETY: see pop().
        unsafe { self.ring.consume_up_to(max_items, handler) }
    }

    /// Process ALL available items with a single tail update.
    ///
    /// Items published while the batch runs are left for the next call.
    ///
    /// ```
    /// let (mut tx, mut rx) = ringspsc_rs::bounded::<u64>(8).unwrap();
    /// tx.push_slice(&[1, 2, 3]);
    ///
    /// let mut batch = Vec::new();
    /// assert_eq!(rx.consume_all(|item| batch.push(item)), 3);
    /// assert_eq!(batch, [1, 2, 3]);
    /// ```
    #[inline]
    pub fn consume_all<F>(&mut self, handler: F) -> usize
    where
        F: FnMut(T),
    {
        self.consume_up_to(usize::MAX, handler)
    }

    /// Returns the ring buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Approximate number of items in the ring (advisory).
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns true if the ring appeared empty (advisory).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns true if the ring appeared full (advisory).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Returns the raw `(head, tail)` cursor values (advisory).
    #[inline]
    pub fn cursors(&self) -> (usize, usize) {
        self.ring.cursors()
    }

    /// Returns true once the [`Producer`] has been dropped.
    ///
    /// Items it published before dropping are still available to `pop`.
    #[inline]
    pub fn is_abandoned(&self) -> bool {
        peer_dropped(&self.ring)
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.ring.metrics()
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").field("ring", &self.ring).finish()
    }
}


/// `strong_count` is a Relaxed load; the fence pairs it with the Release
/// decrement in the peer's `Arc` drop, so everything the peer did before
/// dropping is visible once this returns true.
fn peer_dropped<T>(ring: &Arc<RingBuffer<T>>) -> bool {
    if Arc::strong_count(ring) == 1 {
        fence(Ordering::Acquire);
        true
    } else {
        false
    }
}
