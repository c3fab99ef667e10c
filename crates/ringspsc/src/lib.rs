//! RingSPSC - Lock-Free Single-Producer Single-Consumer Ring Buffer
//!
//! A bounded circular buffer for handing fixed-type items from exactly one
//! producer thread to exactly one consumer thread without locks. The two
//! threads communicate only through two cache-padded cursors and the shared
//! slot array; slot ownership moves with an acquire/release handoff on the
//! cursors.
//!
//! # Key Features
//!
//! - Power-of-two capacity, `index & (N - 1)` slot addressing
//! - Free-running `usize` cursors, correct across counter wraparound
//! - Cursors on separate cache lines (no false sharing)
//! - Non-blocking `push`/`pop`; full and empty are ordinary return values
//! - Safe [`Producer`]/[`Consumer`] handles that enforce SPSC at compile time
//! - Batch consumption (single tail update for N items)
//!
//! # Example
//!
//! ```
//! use ringspsc_rs::bounded;
//!
//! let (mut producer, mut consumer) = bounded::<u64>(4).unwrap();
//!
//! for i in 1..=4 {
//!     producer.push(i).unwrap();
//! }
//! // Full: the item comes back and nothing changes.
//! assert_eq!(producer.push(5), Err(5));
//!
//! assert_eq!(consumer.pop(), Some(1));
//! assert!(producer.push(5).is_ok());
//!
//! let mut rest = Vec::new();
//! consumer.consume_all(|item| rest.push(item));
//! assert_eq!(rest, [2, 3, 4, 5]);
//! assert_eq!(consumer.pop(), None);
//! ```
//!
//! Waiting is always the caller's decision; see [`Backoff`] for a spin-then-yield
//! policy, or the `ringspsc-blocking` crate for condvar-based blocking.

mod backoff;
mod channel;
mod config;
mod error;
mod invariants;
mod metrics;
mod ring;
#[cfg(feature = "stack-ring")]
mod stack_ring;
mod sync;

pub use backoff::Backoff;
pub use channel::{bounded, channel, Consumer, Producer};
pub use config::{Config, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG};
pub use error::RingError;
pub use metrics::MetricsSnapshot;
pub use ring::RingBuffer;
#[cfg(feature = "stack-ring")]
pub use stack_ring::{StackConsumer, StackProducer, StackRing};
