//! Behavioral tests for the SPSC ring through its public API.
//!
//! The concurrent tests are meant to also run under ThreadSanitizer:
//! `RUSTFLAGS="-Zsanitizer=thread" cargo +nightly test -Zbuild-std --target x86_64-unknown-linux-gnu --test integration_tests`

#![cfg(not(feature = "loom"))]

use ringspsc_rs::{bounded, channel, Backoff, Config, RingBuffer, RingError};
use std::collections::HashSet;
use std::thread;

#[test]
fn test_capacity_validation() {
    for capacity in [0usize, 5, 100] {
        assert_eq!(
            RingBuffer::<u64>::with_capacity(capacity).unwrap_err(),
            RingError::InvalidCapacity { capacity }
        );
    }
    for capacity in [1usize, 2, 4, 1024] {
        let ring = RingBuffer::<u64>::with_capacity(capacity).unwrap();
        assert_eq!(ring.capacity(), capacity);
        assert!(ring.is_empty());
    }
}

#[test]
fn test_empty_pop_leaves_state() {
    let (_tx, mut rx) = bounded::<u64>(4).unwrap();
    assert_eq!(rx.pop(), None);
    assert_eq!(rx.cursors(), (0, 0));
}

#[test]
fn test_fill_to_capacity() {
    for capacity in [1usize, 2, 4, 64] {
        let (mut tx, mut rx) = bounded::<usize>(capacity).unwrap();

        for i in 0..capacity {
            assert!(tx.push(i).is_ok(), "push {} of {} failed", i, capacity);
        }

        let before = tx.cursors();
        assert_eq!(tx.push(capacity), Err(capacity));
        assert_eq!(tx.cursors(), before, "failed push mutated state");
        assert!(tx.is_full());

        assert_eq!(rx.pop(), Some(0));
        assert!(tx.push(capacity).is_ok());
    }
}

#[test]
fn test_fifo_ordering() {
    const N: u64 = 1024;
    let (mut tx, mut rx) = bounded::<u64>(N as usize).unwrap();

    for i in 1..=N {
        tx.push(i).unwrap();
    }

    let popped: Vec<u64> = std::iter::from_fn(|| rx.pop()).collect();
    assert_eq!(popped, (1..=N).collect::<Vec<_>>());
}

#[test]
fn test_wraparound_single_items() {
    let (mut tx, mut rx) = bounded::<u32>(4).unwrap();

    for i in 0..10 {
        tx.push(i).unwrap();
        assert_eq!(rx.pop(), Some(i), "wrong value at iteration {}", i);
    }
    assert_eq!(rx.cursors(), (10, 10));
}

#[test]
fn test_wraparound_partial_fill() {
    let (mut tx, mut rx) = bounded::<u32>(4).unwrap();
    let mut next_in = 0;
    let mut next_out = 0;

    // Keep 3 items in flight so the occupied region straddles the array end.
    for _ in 0..3 {
        tx.push(next_in).unwrap();
        next_in += 1;
    }
    for _ in 0..50 {
        tx.push(next_in).unwrap();
        next_in += 1;
        assert_eq!(rx.pop(), Some(next_out));
        next_out += 1;
        assert_eq!(rx.len(), 3);
    }
}

#[test]
fn test_concurrent_stress_ordering() {
    const TOTAL: u64 = 10_000_000;

    let (mut tx, mut rx) = channel::<u64>(Config::new(1 << 10, false)).unwrap();

    let producer = thread::spawn(move || {
        let mut backoff = Backoff::new();
        let mut i = 0;
        while i < TOTAL {
            match tx.push(i) {
                Ok(()) => {
                    i += 1;
                    backoff.reset();
                }
                Err(_) => backoff.snooze(),
            }
        }
    });

    let consumer = thread::spawn(move || {
        let mut expected = 0u64;
        let mut violations = 0u64;
        let mut backoff = Backoff::new();
        while expected < TOTAL {
            match rx.pop() {
                Some(v) => {
                    if v != expected {
                        violations += 1;
                    }
                    expected += 1;
                    backoff.reset();
                }
                None => backoff.snooze(),
            }
        }
        (expected, violations, rx.pop())
    });

    producer.join().unwrap();
    let (consumed, violations, leftover) = consumer.join().unwrap();

    assert_eq!(violations, 0, "FIFO violations detected");
    assert_eq!(consumed, TOTAL);
    assert_eq!(leftover, None);
}

#[test]
fn test_no_loss_or_duplication() {
    const TOTAL: usize = 200_000;

    let (mut tx, mut rx) = channel::<String>(Config::new(64, true)).unwrap();

    let producer = thread::spawn(move || {
        for i in 0..TOTAL {
            let mut item = i.to_string();
            while let Err(back) = tx.push(item) {
                item = back;
                thread::yield_now();
            }
        }
        tx.metrics()
    });

    let mut seen = HashSet::with_capacity(TOTAL);
    while seen.len() < TOTAL {
        let taken = rx.consume_up_to(16, |item| {
            assert!(seen.insert(item.clone()), "duplicate item {}", item);
        });
        if taken == 0 {
            thread::yield_now();
        }
    }

    let producer_metrics = producer.join().unwrap();
    assert_eq!(producer_metrics.items_pushed, TOTAL as u64);
    assert_eq!(rx.metrics().items_popped, TOTAL as u64);
    assert!((0..TOTAL).all(|i| seen.contains(&i.to_string())));
    assert!(rx.is_empty());
}

#[test]
fn test_batch_producer_and_consumer() {
    const TOTAL: u64 = 1_000_000;

    let (mut tx, mut rx) = bounded::<u64>(256).unwrap();

    let producer = thread::spawn(move || {
        let mut sent = 0u64;
        let mut chunk = [0u64; 64];
        while sent < TOTAL {
            let want = 64.min(TOTAL - sent) as usize;
            for (i, slot) in chunk[..want].iter_mut().enumerate() {
                *slot = sent + i as u64;
            }
            let n = tx.push_slice(&chunk[..want]);
            sent += n as u64;
            if n == 0 {
                std::hint::spin_loop();
            }
        }
    });

    let mut expected = 0u64;
    while expected < TOTAL {
        rx.consume_all(|item| {
            assert_eq!(item, expected);
            expected += 1;
        });
    }

    producer.join().unwrap();
    assert!(rx.is_empty());
}

#[test]
fn test_abandoned_producer_leaves_every_item_poppable() {
    const ITEMS: u64 = 64;

    for _ in 0..200 {
        let (mut tx, mut rx) = bounded::<u64>(64).unwrap();

        let producer = thread::spawn(move || {
            for i in 0..ITEMS {
                tx.push(i).unwrap();
            }
        });

        let mut backoff = Backoff::new();
        while !rx.is_abandoned() {
            backoff.snooze();
        }

        // Once the producer is seen gone, nothing it pushed may be missing.
        let mut drained = 0;
        while let Some(v) = rx.pop() {
            assert_eq!(v, drained);
            drained += 1;
        }
        assert_eq!(drained, ITEMS);

        producer.join().unwrap();
    }
}
