//! Blocking channel construction.

use crate::config::WaitConfig;
use crate::error::BlockingError;
use crate::receiver::BlockingReceiver;
use crate::sender::BlockingSender;
use crate::signal::Shared;
use ringspsc_rs::{Config, RingBuffer};
use std::sync::Arc;

/// Creates a blocking SPSC channel with `capacity` slots and default waiting.
///
/// Fails with [`BlockingError::Ring`] if `capacity` is zero or not a power of two.
///
/// # Example
///
/// ```
/// use ringspsc_blocking::blocking_channel;
/// use std::thread;
///
/// let (mut tx, mut rx) = blocking_channel::<u64>(16).unwrap();
///
/// let producer = thread::spawn(move || {
///     for i in 0..1000 {
///         tx.send(i).unwrap();
///     }
///     // tx dropped here: the receiver drains and then sees Closed
/// });
///
/// let received: Vec<u64> = rx.iter().collect();
/// assert_eq!(received, (0..1000).collect::<Vec<_>>());
/// producer.join().unwrap();
/// ```
pub fn blocking_channel<T>(
    capacity: usize,
) -> Result<(BlockingSender<T>, BlockingReceiver<T>), BlockingError> {
    blocking_channel_with_config(
        Config {
            capacity,
            ..Config::default()
        },
        WaitConfig::default(),
    )
}

/// Creates a blocking SPSC channel with custom ring and wait configuration.
///
/// # Arguments
///
/// * `config` - The ring configuration (capacity, metrics)
/// * `wait` - How blocked calls spin and park
pub fn blocking_channel_with_config<T>(
    config: Config,
    wait: WaitConfig,
) -> Result<(BlockingSender<T>, BlockingReceiver<T>), BlockingError> {
    let (producer, consumer) = RingBuffer::new(config)?.split();
    let shared = Arc::new(Shared::new());

    Ok((
        BlockingSender::new(producer, Arc::clone(&shared), wait),
        BlockingReceiver::new(consumer, shared, wait),
    ))
}
