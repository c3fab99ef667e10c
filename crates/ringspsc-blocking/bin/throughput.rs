//! End-to-end throughput harness.
//!
//! One producer pushes an increasing sequence through a 1M-slot ring, one
//! consumer checks every value arrives in order, and the run reports
//! messages per second. The same workload then goes through the blocking
//! channel for comparison.
//!
//! Usage: `cargo run -p ringspsc-blocking --features demo --release --bin ringspsc-throughput [MESSAGES]`
//! Set `RUST_LOG=debug` to see channel lifecycle events.

use ringspsc_blocking::{blocking_channel_with_config, WaitConfig};
use ringspsc_rs::{channel, HIGH_THROUGHPUT_CONFIG};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_MESSAGES: u64 = 100_000_000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let messages = match std::env::args().nth(1).map(|arg| arg.parse::<u64>()) {
        None => DEFAULT_MESSAGES,
        Some(Ok(n)) => n,
        Some(Err(err)) => {
            error!(%err, "MESSAGES must be a non-negative integer");
            std::process::exit(2);
        }
    };

    info!(
        messages,
        capacity = HIGH_THROUGHPUT_CONFIG.capacity,
        "starting SPSC throughput run"
    );

    let spin = run_spin(messages);
    report("spin push/pop", messages, spin);

    let blocking = run_blocking(messages);
    report("blocking send/recv", messages, blocking);
}

fn run_spin(messages: u64) -> Duration {
    let (mut tx, mut rx) = match channel::<u64>(HIGH_THROUGHPUT_CONFIG) {
        Ok(pair) => pair,
        Err(err) => {
            error!(%err, "failed to build ring");
            std::process::exit(1);
        }
    };

    let start = Instant::now();

    let producer = thread::spawn(move || {
        let mut i = 0;
        while i < messages {
            if tx.push(i).is_ok() {
                i += 1;
            }
        }
    });

    let consumer = thread::spawn(move || {
        let mut expected = 0;
        while expected < messages {
            if let Some(v) = rx.pop() {
                assert_eq!(v, expected, "ordering violation");
                expected += 1;
            }
        }
    });

    producer.join().expect("producer panicked");
    consumer.join().expect("consumer panicked");
    start.elapsed()
}

fn run_blocking(messages: u64) -> Duration {
    let (mut tx, mut rx) =
        match blocking_channel_with_config::<u64>(HIGH_THROUGHPUT_CONFIG, WaitConfig::default()) {
            Ok(pair) => pair,
            Err(err) => {
                error!(%err, "failed to build blocking channel");
                std::process::exit(1);
            }
        };

    let start = Instant::now();

    let producer = thread::spawn(move || {
        for i in 0..messages {
            if tx.send(i).is_err() {
                break;
            }
        }
    });

    let consumer = thread::spawn(move || {
        let mut expected = 0;
        for v in rx.iter() {
            assert_eq!(v, expected, "ordering violation");
            expected += 1;
        }
        expected
    });

    producer.join().expect("producer panicked");
    let received = consumer.join().expect("consumer panicked");
    assert_eq!(received, messages, "lost messages");
    start.elapsed()
}

fn report(label: &str, messages: u64, elapsed: Duration) {
    let secs = elapsed.as_secs_f64();
    info!(
        mode = label,
        messages,
        seconds = format_args!("{secs:.3}"),
        ops_per_sec = format_args!("{:.0}", messages as f64 / secs),
        "processed"
    );
}
