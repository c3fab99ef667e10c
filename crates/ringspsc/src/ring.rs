use crate::invariants::{
    debug_assert_bounded_count, debug_assert_initialized_read, debug_assert_monotonic,
    debug_assert_tail_not_past_head,
};
use crate::metrics::Metrics;
use crate::sync::atomic::{AtomicUsize, Ordering};
use crate::sync::cell::UnsafeCell;
use crate::{Config, Consumer, MetricsSnapshot, Producer, RingError};
use crossbeam_utils::CachePadded;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::Arc;

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// ## Cursors
//
// `head` and `tail` are free-running `usize` counters, never reduced modulo
// the capacity. The slot index is `cursor & mask`. Because the capacity is a
// power of two and both counters share the same unsigned width,
// `head.wrapping_sub(tail)` is the exact occupancy even after the counters
// themselves wrap past `usize::MAX`.
//
// ## Memory Ordering Protocol
//
// **Producer (push):**
// 1. Load `head` with Relaxed (only the producer writes head)
// 2. Load `tail` with Acquire (synchronizes with the consumer's Release)
// 3. If `head - tail >= capacity`: full, return the item untouched
// 4. Write the item into slot `head & mask`
// 5. Store `head + 1` with Release (publishes the slot to the consumer)
//
// **Consumer (pop):**
// 1. Load `tail` with Relaxed (only the consumer writes tail)
// 2. Load `head` with Acquire (synchronizes with the producer's Release)
// 3. If `head == tail`: empty, return None
// 4. Move the item out of slot `tail & mask`
// 5. Store `tail + 1` with Release (hands the slot back to the producer)
//
// ## Slot Ownership
//
// A slot in `[tail, head)` holds a published item and belongs to the
// consumer. Every other slot is uninitialized and belongs to the producer.
// Ownership moves only through the Release/Acquire pair on a cursor, never
// through a lock. A Relaxed cursor read carries no visibility guarantee for
// slot contents; it is only used by the cursor's own writer and in `Drop`.
//
// Slots are `sync::cell::UnsafeCell`, which becomes loom's tracked cell under
// the `loom` feature, so the model checker sees every slot access.
//
// =============================================================================

/// Bounded lock-free SPSC ring buffer with heap storage.
///
/// The capacity is fixed at construction and must be a non-zero power of two.
/// `head` and `tail` are padded onto separate cache lines so the producer's and
/// consumer's stores never contend for the same line.
///
/// # Single-producer / single-consumer contract
///
/// At most one thread may call [`push`](Self::push) at a time and at most one
/// thread may call [`pop`](Self::pop) at a time. The ring does not detect
/// violations; two concurrent producers (or consumers) race on the same slot
/// and cursor. This is why `push`/`pop` are `unsafe`. Use
/// [`split`](Self::split) to obtain [`Producer`]/[`Consumer`] handles that
/// enforce the contract at compile time.
pub struct RingBuffer<T> {
    /// Next slot to write. Written by the producer, read by the consumer.
    head: CachePadded<AtomicUsize>,
    /// Next slot to read. Written by the consumer, read by the producer.
    tail: CachePadded<AtomicUsize>,

    metrics: Metrics,
    config: Config,

    /// Fixed-size storage; a boxed slice because it never grows.
    buffer: Box<[UnsafeCell<MaybeUninit<T>>]>,
}

// Safety: items move from the producer thread to the consumer thread, so T
// must be Send. Slot access is serialized by the cursor handoff.
unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    /// Creates an empty ring buffer (`head = tail = 0`).
    ///
    /// Fails with [`RingError::InvalidCapacity`] if `config.capacity` is zero
    /// or not a power of two.
    pub fn new(config: Config) -> Result<Self, RingError> {
        Self::with_start_cursor(config, 0)
    }

    /// Creates an empty ring buffer with the given capacity and default settings.
    pub fn with_capacity(capacity: usize) -> Result<Self, RingError> {
        Self::new(Config {
            capacity,
            ..Config::default()
        })
    }

    /// Both cursors start at `start`. Lets tests cross the `usize::MAX` boundary.
    pub(crate) fn with_start_cursor(config: Config, start: usize) -> Result<Self, RingError> {
        config.validate()?;

        let buffer = (0..config.capacity)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();

        Ok(Self {
            head: CachePadded::new(AtomicUsize::new(start)),
            tail: CachePadded::new(AtomicUsize::new(start)),
            metrics: Metrics::new(),
            config,
            buffer,
        })
    }

    // ---------------------------------------------------------------------
    // CONSTANTS & STATUS
    // ---------------------------------------------------------------------
    //
    // Everything in this section is an advisory snapshot. With both threads
    // running, the answer is stale as soon as it is returned and must never
    // be used to infer that a slot is ready.

    /// Returns the ring buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    #[inline]
    fn mask(&self) -> usize {
        self.config.mask()
    }

    /// Approximate number of items in the ring.
    #[inline]
    pub fn len(&self) -> usize {
        // tail first, with Acquire: the head read below is at least as new as
        // the head the consumer saw before storing this tail, so head >= tail.
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        head.wrapping_sub(tail).min(self.capacity())
    }

    /// Returns true if the ring appeared empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the ring appeared full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Returns the raw `(head, tail)` cursor values.
    #[inline]
    pub fn cursors(&self) -> (usize, usize) {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        (head, tail)
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            self.metrics.snapshot()
        } else {
            MetricsSnapshot::default()
        }
    }

    #[inline]
    fn slot(&self, pos: usize) -> &UnsafeCell<MaybeUninit<T>> {
        &self.buffer[pos & self.mask()]
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Enqueue one item.
    ///
    /// Returns `Ok(())` on success. If the ring is full, returns `Err(item)`
    /// and changes nothing; that is backpressure, not a failure, and the
    /// caller decides whether to retry, spin or block.
    ///
    /// # Safety
    ///
    /// No other thread may call `push` or [`push_slice`](Self::push_slice)
    /// on this ring concurrently.
    #[inline]
    pub unsafe fn push(&self, item: T) -> Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if head.wrapping_sub(tail) >= self.capacity() {
            if self.config.enable_metrics {
                self.metrics.add_push_full();
            }
            return Err(item);
        }

        // SAFETY: head - tail < capacity, so slot(head) is outside [tail, head)
        // and the consumer will not touch it until head is published below.
        // The caller guarantees no second producer writes it.
        unsafe {
            self.slot(head).with_mut(|slot| {
                (*slot).write(item);
            });
        }

        let new_head = head.wrapping_add(1);
        debug_assert_bounded_count!(new_head.wrapping_sub(tail), self.capacity());
        debug_assert_monotonic!("head", head, new_head, self.capacity());

        self.head.store(new_head, Ordering::Release);

        if self.config.enable_metrics {
            self.metrics.add_pushed(1);
        }
        Ok(())
    }

    /// Enqueue as many items from `items` as fit, publishing `head` once.
    ///
    /// Returns the number of items written (a prefix of `items`).
    ///
    /// # Safety
    ///
    /// Same contract as [`push`](Self::push).
    pub unsafe fn push_slice(&self, items: &[T]) -> usize
    where
        T: Copy,
    {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        let free = self.capacity() - head.wrapping_sub(tail);
        let n = items.len().min(free);
        if n == 0 {
            if self.config.enable_metrics && !items.is_empty() {
                self.metrics.add_push_full();
            }
            return 0;
        }

        for (i, item) in items[..n].iter().enumerate() {
            // SAFETY: head + i stays within the free region [head, tail + capacity)
            unsafe {
                self.slot(head.wrapping_add(i)).with_mut(|slot| {
                    (*slot).write(*item);
                });
            }
        }

        let new_head = head.wrapping_add(n);
        debug_assert_bounded_count!(new_head.wrapping_sub(tail), self.capacity());
        debug_assert_monotonic!("head", head, new_head, self.capacity());

        self.head.store(new_head, Ordering::Release);

        if self.config.enable_metrics {
            self.metrics.add_pushed(n as u64);
        }
        n
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Dequeue the oldest item, or `None` if the ring is empty.
    ///
    /// # Safety
    ///
    /// No other thread may call `pop` or [`consume_up_to`](Self::consume_up_to)
    /// on this ring concurrently.
    #[inline]
    pub unsafe fn pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if head == tail {
            if self.config.enable_metrics {
                self.metrics.add_pop_empty();
            }
            return None;
        }

        debug_assert_initialized_read!(tail, tail, head);

        // SAFETY: tail is in [tail, head), so the slot holds an item the
        // producer published with Release; the Acquire load of head above
        // makes the write visible. Moving it out leaves the slot uninitialized,
        // and the producer cannot reuse it until tail is advanced below.
        let item = unsafe { self.slot(tail).with(|slot| (*slot).assume_init_read()) };

        let new_tail = tail.wrapping_add(1);
        debug_assert_tail_not_past_head!(tail, new_tail, head);
        debug_assert_monotonic!("tail", tail, new_tail, self.capacity());

        self.tail.store(new_tail, Ordering::Release);

        if self.config.enable_metrics {
            self.metrics.add_popped(1);
        }
        Some(item)
    }

    /// Hand up to `max_items` items to `handler` in FIFO order, publishing
    /// `tail` once for the whole batch.
    ///
    /// Returns the number of items consumed. If `handler` panics, the items
    /// already handed out stay consumed and the rest remain in the ring.
    ///
    /// # Safety
    ///
    /// Same contract as [`pop`](Self::pop).
    pub unsafe fn consume_up_to<F>(&self, max_items: usize, mut handler: F) -> usize
    where
        F: FnMut(T),
    {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        let avail = head.wrapping_sub(tail);
        if avail == 0 || max_items == 0 {
            if self.config.enable_metrics && avail == 0 {
                self.metrics.add_pop_empty();
            }
            return 0;
        }

        let to_consume = avail.min(max_items);
        let mut publish = PublishOnDrop {
            cursor: &*self.tail,
            pos: tail,
        };

        // No atomics in the loop; the guard stores the final tail once.
        for _ in 0..to_consume {
            let pos = publish.pos;
            debug_assert_initialized_read!(pos, tail, head);

            // SAFETY: pos is in [tail, head); see pop().
            let item = unsafe { self.slot(pos).with(|slot| (*slot).assume_init_read()) };
            publish.pos = pos.wrapping_add(1);
            handler(item);
        }

        debug_assert_tail_not_past_head!(tail, publish.pos, head);
        debug_assert_monotonic!("tail", tail, publish.pos, self.capacity());
        drop(publish);

        if self.config.enable_metrics {
            self.metrics.add_popped(to_consume as u64);
        }
        to_consume
    }

    // ---------------------------------------------------------------------
    // HANDLES
    // ---------------------------------------------------------------------

    /// Splits the ring into its producer and consumer halves.
    ///
    /// Neither half is `Clone`, and both take `&mut self` for data operations,
    /// so safe code cannot break the SPSC contract.
    pub fn split(self) -> (Producer<T>, Consumer<T>) {
        let ring = Arc::new(self);
        (Producer::new(Arc::clone(&ring)), Consumer::new(ring))
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // &mut self: both sides are gone, so Relaxed loads see the final values.
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Relaxed);
        let count = head.wrapping_sub(tail);
        let mask = self.mask();

        for i in 0..count {
            let idx = tail.wrapping_add(i) & mask;
            // SAFETY: every slot in [tail, head) holds an initialized item
            // that nobody moved out.
            unsafe { self.buffer[idx].with_mut(|slot| (*slot).assume_init_drop()) };
        }
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (head, tail) = self.cursors();
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("head", &head)
            .field("tail", &tail)
            .finish_non_exhaustive()
    }
}

/// Stores the consumer's progress on scope exit, including unwinding out of
/// a batch handler.
struct PublishOnDrop<'a> {
    cursor: &'a AtomicUsize,
    pos: usize,
}

impl Drop for PublishOnDrop<'_> {
    fn drop(&mut self) {
        self.cursor.store(self.pos, Ordering::Release);
    }
}
