//! Stack-allocated SPSC ring buffer with compile-time capacity.
//!
//! [`StackRing<T, N>`] embeds its storage directly in the struct, so there is
//! no heap allocation and `N` is checked when the type is instantiated rather
//! than when a value is built. The push/pop protocol is identical to
//! [`RingBuffer`](crate::RingBuffer); see `ring.rs` for the ordering argument.
//!
//! # Usage
//!
//! ```
//! use ringspsc_rs::StackRing;
//! use std::thread;
//!
//! let mut ring: StackRing<u64, 64> = StackRing::new();
//! let (mut tx, mut rx) = ring.split();
//!
//! thread::scope(|s| {
//!     s.spawn(move || {
//!         for i in 0..1000 {
//!             while tx.push(i).is_err() {
//!                 std::hint::spin_loop();
//!             }
//!         }
//!     });
//!
//!     let mut next = 0;
//!     while next < 1000 {
//!         if let Some(v) = rx.pop() {
//!             assert_eq!(v, next);
//!             next += 1;
//!         }
//!     }
//! });
//! ```
//!
//! # Size Constraints
//!
//! `StackRing<u64, 4096>` is about 33KB plus padding and is fine on any
//! thread stack. Much larger rings may overflow default thread stacks; box
//! them or use the heap-based ring instead.

use crate::invariants::{
    debug_assert_bounded_count, debug_assert_initialized_read, debug_assert_monotonic,
    debug_assert_tail_not_past_head,
};
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A stack-allocated SPSC ring buffer with compile-time capacity.
///
/// # Type Parameters
///
/// - `T`: The element type
/// - `N`: The buffer capacity (must be a non-zero power of 2)
///
/// # Memory Layout
///
/// ```text
/// ┌───────────────────────────────────────────────────────┐
/// │ head: CachePadded<AtomicUsize>  ← producer writes     │
/// ├───────────────────────────────────────────────────────┤
/// │ tail: CachePadded<AtomicUsize>  ← consumer writes     │
/// ├───────────────────────────────────────────────────────┤
/// │ [UnsafeCell<MaybeUninit<T>>; N] (inline)              │
/// └───────────────────────────────────────────────────────┘
/// ```
pub struct StackRing<T, const N: usize> {
    head: CachePadded<AtomicUsize>,
    tail: CachePadded<AtomicUsize>,
    buffer: [UnsafeCell<MaybeUninit<T>>; N],
}

// Safety: same argument as RingBuffer; items cross threads, so T: Send.
unsafe impl<T: Send, const N: usize> Send for StackRing<T, N> {}
unsafe impl<T: Send, const N: usize> Sync for StackRing<T, N> {}

impl<T, const N: usize> StackRing<T, N> {
    /// Evaluated on instantiation; a bad `N` is a compile error.
    const VALID_CAPACITY: () = assert!(
        N.is_power_of_two(),
        "StackRing capacity must be a non-zero power of 2"
    );

    /// The mask for wrapping indices: `N - 1`
    const MASK: usize = N - 1;

    #[allow(clippy::declare_interior_mutable_const)]
    const EMPTY_SLOT: UnsafeCell<MaybeUninit<T>> = UnsafeCell::new(MaybeUninit::uninit());

    /// Creates a new, empty stack-allocated ring buffer.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;

        Self {
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            buffer: [Self::EMPTY_SLOT; N],
        }
    }

    /// Returns the ring buffer capacity (`N`).
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Approximate number of items in the ring (advisory).
    #[inline]
    pub fn len(&self) -> usize {
        // tail first, with Acquire, so the head read below is never older
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        head.wrapping_sub(tail).min(N)
    }

    /// Returns true if the ring appeared empty (advisory).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the ring appeared full (advisory).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= N
    }

    /// Returns the raw `(head, tail)` cursor values (advisory).
    #[inline]
    pub fn cursors(&self) -> (usize, usize) {
        let tail = self.tail.load(Ordering::Acquire);
        let head = self.head.load(Ordering::Acquire);
        (head, tail)
    }

    /// Enqueue one item, or hand it back in `Err` if the ring is full.
    ///
    /// # Safety
    ///
    /// No other thread may call `push` on this ring concurrently.
    #[inline]
    pub unsafe fn push(&self, item: T) -> Result<(), T> {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);

        if head.wrapping_sub(tail) >= N {
            return Err(item);
        }

        // SAFETY: the slot is outside [tail, head) and owned by the producer.
        unsafe { (*self.buffer[head & Self::MASK].get()).write(item) };

        let new_head = head.wrapping_add(1);
        debug_assert_bounded_count!(new_head.wrapping_sub(tail), N);
        debug_assert_monotonic!("head", head, new_head, N);

        self.head.store(new_head, Ordering::Release);
        Ok(())
    }

    /// Dequeue the oldest item, or `None` if the ring is empty.
    ///
    /// # Safety
    ///
    /// No other thread may call `pop` on this ring concurrently.
    #[inline]
    pub unsafe fn pop(&self) -> Option<T> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if head == tail {
            return None;
        }

        debug_assert_initialized_read!(tail, tail, head);

        // SAFETY: the slot is in [tail, head) and was published with Release.
        let item = unsafe { (*self.buffer[tail & Self::MASK].get()).assume_init_read() };

        let new_tail = tail.wrapping_add(1);
        debug_assert_tail_not_past_head!(tail, new_tail, head);
        debug_assert_monotonic!("tail", tail, new_tail, N);

        self.tail.store(new_tail, Ordering::Release);
        Some(item)
    }

    /// Borrows the ring as a producer/consumer pair.
    ///
    /// Taking `&mut self` guarantees no other handle or `unsafe` caller is
    /// active while the pair lives.
    pub fn split(&mut self) -> (StackProducer<'_, T, N>, StackConsumer<'_, T, N>) {
        let ring: &Self = self;
        (StackProducer { ring }, StackConsumer { ring })
    }
}

impl<T, const N: usize> Default for StackRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Drop for StackRing<T, N> {
    fn drop(&mut self) {
        let tail = *self.tail.get_mut();
        let head = *self.head.get_mut();

        for i in 0..head.wrapping_sub(tail) {
            let idx = tail.wrapping_add(i) & Self::MASK;
            // SAFETY: slots in [tail, head) are initialized and unconsumed.
            unsafe { self.buffer[idx].get_mut().assume_init_drop() };
        }
    }
}

impl<T, const N: usize> fmt::Debug for StackRing<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (head, tail) = self.cursors();
        f.debug_struct("StackRing")
            .field("capacity", &N)
            .field("head", &head)
            .field("tail", &tail)
            .finish_non_exhaustive()
    }
}

/// Writing half borrowed from a [`StackRing`].
pub struct StackProducer<'a, T, const N: usize> {
    ring: &'a StackRing<T, N>,
}

impl<T, const N: usize> StackProducer<'_, T, N> {
    /// Enqueue one item, or hand it back in `Err` if the ring is full.
    #[inline]
    pub fn push(&mut self, item: T) -> Result<(), T> {
        // SAFETY: the only producer handle, borrowed mutably.
        unsafe { self.ring.push(item) }
    }

    /// Returns true if the ring appeared full (advisory).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
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
}

/// Reading half borrowed from a [`StackRing`].
pub struct StackConsumer<'a, T, const N: usize> {
    ring: &'a StackRing<T, N>,
}

impl<T, const N: usize> StackConsumer<'_, T, N> {
    /// Dequeue the oldest item, or `None` if the ring is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        // SAFETY: the only consumer handle, borrowed mutably.
        unsafe { self.ring.pop() }
    }

    /// Returns true if the ring appeared empty (advisory).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Approximate number of items in the ring (advisory).
    #[inline]
    pub fn len(&self) -> usize {
        self.ring.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_ring_fifo_and_full() {
        let ring: StackRing<u32, 4> = StackRing::new();
        unsafe {
            for i in 1..=4 {
                assert!(ring.push(i).is_ok());
            }
            assert_eq!(ring.push(5), Err(5));
            assert_eq!(ring.cursors(), (4, 0));
            for i in 1..=4 {
                assert_eq!(ring.pop(), Some(i));
            }
            assert_eq!(ring.pop(), None);
        }
    }

    #[test]
    fn test_stack_ring_drop_releases_items() {
        use std::rc::Rc;

        let marker = Rc::new(());
        {
            let ring: StackRing<Rc<()>, 8> = StackRing::new();
            for _ in 0..3 {
                unsafe { ring.push(Rc::clone(&marker)).unwrap() };
            }
            assert_eq!(Rc::strong_count(&marker), 4);
        }
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[test]
    fn test_capacity_one() {
        let mut ring: StackRing<u8, 1> = StackRing::default();
        let (mut tx, mut rx) = ring.split();
        assert!(tx.push(1).is_ok());
        assert!(tx.is_full());
        assert_eq!(tx.push(2), Err(2));
        assert_eq!(rx.pop(), Some(1));
        assert!(rx.is_empty());
    }
}
