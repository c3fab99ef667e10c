//! Blocking Adapters for ringspsc-rs
//!
//! The core ring never waits: `push` on a full ring and `pop` on an empty ring
//! return immediately. This crate layers blocking `send`/`recv` on top for
//! callers that would rather sleep than poll.
//!
//! # Features
//!
//! - **Lock-free fast path**: an uncontended send or recv is one ring
//!   operation plus a fence; the mutex is only touched when a side is parked
//! - **Backpressure**: senders wait while the ring is full, woken when a slot frees
//! - **Spin, then park**: optional [`ringspsc_rs::Backoff`] phase before parking on a condvar
//! - **Timeouts**: `send_timeout`/`recv_timeout` apply a per-call deadline
//! - **Disconnect**: dropping either half closes the channel; the receiver
//!   drains remaining items first
//!
//! # Example
//!
//! ```
//! use ringspsc_blocking::{blocking_channel, BlockingError};
//! use std::time::Duration;
//!
//! let (mut tx, mut rx) = blocking_channel::<&str>(2).unwrap();
//!
//! tx.send("a").unwrap();
//! tx.send("b").unwrap();
//! let err = tx.send_timeout("c", Duration::from_millis(5)).unwrap_err();
//! assert_eq!(err.kind, BlockingError::Timeout);
//!
//! assert_eq!(rx.recv(), Ok("a"));
//! drop(tx);
//! assert_eq!(rx.recv(), Ok("b"));
//! assert_eq!(rx.recv(), Err(BlockingError::Closed));
//! ```

mod channel;
mod config;
mod error;
mod receiver;
mod sender;
mod signal;

pub use channel::{blocking_channel, blocking_channel_with_config};
pub use config::WaitConfig;
pub use error::{BlockingError, SendError};
pub use receiver::BlockingReceiver;
pub use sender::BlockingSender;
