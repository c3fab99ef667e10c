//! Error types for ring construction.

use thiserror::Error;

/// Errors that can occur when building a ring buffer.
///
/// A full or empty ring is not an error: `push` hands the item back and `pop`
/// returns `None`, and callers decide whether to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// The requested capacity is zero or not a power of two.
    #[error("invalid ring capacity {capacity}: must be a non-zero power of two")]
    InvalidCapacity { capacity: usize },
}
