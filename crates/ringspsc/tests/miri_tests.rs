//! Miri-compatible tests for detecting undefined behavior.
//!
//! Run with: `cargo +nightly miri test -p ringspsc-rs --test miri_tests`
//!
//! These tests are small enough for the interpreter and exercise the unsafe
//! slot handling: uninitialized reads, double drops, leaks, and
//! out-of-bounds indexing across wraparound.

#![cfg(not(feature = "loom"))]

use ringspsc_rs::{bounded, RingBuffer};
use std::thread;

/// Basic push/pop on heap-owning items.
#[test]
fn miri_ring_basic_operations() {
    let (mut tx, mut rx) = bounded::<String>(4).unwrap();

    tx.push(String::from("hello")).unwrap();
    tx.push(String::from("world")).unwrap();

    assert_eq!(rx.pop().as_deref(), Some("hello"));
    assert_eq!(rx.pop().as_deref(), Some("world"));
    assert_eq!(rx.pop(), None);
}

/// Fill and drain multiple times to exercise wrap-around.
#[test]
fn miri_ring_wrap_around() {
    let (mut tx, mut rx) = bounded::<Box<u32>>(4).unwrap();

    for round in 0..3 {
        for i in 0..4 {
            assert!(tx.push(Box::new(round * 10 + i)).is_ok(), "push failed at round {} item {}", round, i);
        }
        assert!(tx.push(Box::new(0)).is_err());

        let mut count = 0;
        rx.consume_all(|item| {
            assert_eq!(*item, round * 10 + count);
            count += 1;
        });
        assert_eq!(count, 4);
    }
}

/// Dropping the ring with unconsumed items frees them exactly once.
#[test]
fn miri_ring_drop_with_items() {
    let (mut tx, mut rx) = bounded::<Vec<u8>>(4).unwrap();

    // Offset the cursors so the live items straddle the array end.
    for _ in 0..3 {
        tx.push(vec![0]).unwrap();
        rx.pop().unwrap();
    }
    tx.push(vec![1, 2, 3]).unwrap();
    tx.push(vec![4, 5, 6]).unwrap();
    tx.push(vec![7]).unwrap();

    assert_eq!(rx.pop(), Some(vec![1, 2, 3]));
    drop(tx);
    drop(rx);
}

/// A rejected push hands back the same allocation, never a copy.
#[test]
fn miri_full_push_returns_item() {
    let ring = RingBuffer::<Box<u64>>::with_capacity(1).unwrap();
    unsafe {
        ring.push(Box::new(1)).unwrap();
        let rejected = Box::new(2);
        let addr = &*rejected as *const u64;
        let back = ring.push(rejected).unwrap_err();
        assert_eq!(&*back as *const u64, addr);
        assert_eq!(*ring.pop().unwrap(), 1);
    }
}

/// Two real threads; Miri's data-race detector checks the cursor handoff.
#[test]
fn miri_two_threads() {
    const N: u32 = 64;
    let (mut tx, mut rx) = bounded::<Box<u32>>(2).unwrap();

    let producer = thread::spawn(move || {
        for i in 0..N {
            let mut item = Box::new(i);
            while let Err(back) = tx.push(item) {
                item = back;
                thread::yield_now();
            }
        }
    });

    let mut next = 0;
    while next < N {
        match rx.pop() {
            Some(v) => {
                assert_eq!(*v, next);
                next += 1;
            }
            None => thread::yield_now(),
        }
    }
    producer.join().unwrap();
}
