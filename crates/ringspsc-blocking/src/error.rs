//! Error types for blocking channel operations.

use ringspsc_rs::RingError;
use thiserror::Error;

/// Errors that can occur in blocking channel operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockingError {
    /// The ring buffer is full and cannot accept more items.
    #[error("ring buffer is full")]
    Full,

    /// The ring buffer holds no items.
    #[error("ring buffer is empty")]
    Empty,

    /// The other side of the channel has been dropped.
    #[error("channel is closed")]
    Closed,

    /// The deadline passed before the operation could complete.
    #[error("operation timed out")]
    Timeout,

    /// The channel could not be built.
    #[error("invalid ring configuration: {0}")]
    Ring(#[from] RingError),
}

impl BlockingError {
    /// Returns `true` if retrying the same operation later may succeed.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Full | Self::Empty | Self::Timeout)
    }

    /// Returns `true` if this error indicates the channel is permanently unusable.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// A failed send. The unsent item is handed back to the caller.
#[derive(Debug, PartialEq, Eq, Error)]
#[error("send failed: {kind}")]
pub struct SendError<T> {
    /// The item that was not sent.
    pub item: T,
    /// Why the send failed: `Full`, `Closed` or `Timeout`.
    pub kind: BlockingError,
}

impl<T> SendError<T> {
    pub(crate) fn new(item: T, kind: BlockingError) -> Self {
        Self { item, kind }
    }

    /// Recovers the unsent item.
    pub fn into_inner(self) -> T {
        self.item
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(BlockingError::Full.is_recoverable());
        assert!(BlockingError::Timeout.is_recoverable());
        assert!(!BlockingError::Closed.is_recoverable());
        assert!(BlockingError::Closed.is_terminal());

        let err: BlockingError = RingError::InvalidCapacity { capacity: 3 }.into();
        assert!(!err.is_recoverable() && !err.is_terminal());
    }

    #[test]
    fn test_send_error_returns_item() {
        let err = SendError::new(String::from("payload"), BlockingError::Closed);
        assert_eq!(err.to_string(), "send failed: channel is closed");
        assert_eq!(err.into_inner(), "payload");
    }
}
