//! Debug assertion macros for ring buffer invariants.
//!
//! Active only in debug builds (`#[cfg(debug_assertions)]`), so release builds
//! pay nothing. Cursor naming follows the ring: `head` is advanced by the
//! producer, `tail` by the consumer, and both are wrapping `usize` counters.
//!
//! Used by both `RingBuffer<T>` and `StackRing<T, N>`.

// =============================================================================
// Bounded Occupancy
// =============================================================================

/// Assert that occupancy does not exceed capacity.
///
/// **Invariant**: `0 ≤ head.wrapping_sub(tail) ≤ capacity`
///
/// Used in: push paths after computing the new head
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "bounded occupancy violated: count {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

/// Assert that the consumer does not advance `tail` past `head`.
///
/// **Invariant**: `new_tail - old_tail ≤ head - old_tail` (wrapping)
///
/// Used in: pop paths before publishing the new tail
macro_rules! debug_assert_tail_not_past_head {
    ($old_tail:expr, $new_tail:expr, $head:expr) => {
        debug_assert!(
            $new_tail.wrapping_sub($old_tail) <= $head.wrapping_sub($old_tail),
            "bounded occupancy violated: advancing tail {} beyond head {}",
            $new_tail,
            $head
        )
    };
}

// =============================================================================
// Monotonic Progress
// =============================================================================

/// Assert that a cursor only moves forward by at most `capacity` in one step.
///
/// Plain `>=` would misfire when the counter wraps past `usize::MAX`, so the
/// step is measured with wrapping subtraction instead.
macro_rules! debug_assert_monotonic {
    ($name:literal, $old:expr, $new:expr, $capacity:expr) => {
        debug_assert!(
            $new.wrapping_sub($old) <= $capacity,
            "monotonic progress violated: {} moved from {} to {}",
            $name,
            $old,
            $new
        )
    };
}

// =============================================================================
// Initialized Range
// =============================================================================

/// Assert that we're reading from a published slot.
///
/// **Invariant**: `slot(pos) is initialized ⟺ tail ≤ pos < head` (wrapping)
///
/// Used in: pop paths before `assume_init_read()`
macro_rules! debug_assert_initialized_read {
    ($pos:expr, $tail:expr, $head:expr) => {
        debug_assert!(
            $pos.wrapping_sub($tail) < $head.wrapping_sub($tail),
            "initialized range violated: reading slot at seq {} outside [{}, {})",
            $pos,
            $tail,
            $head
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_initialized_read;
pub(crate) use debug_assert_monotonic;
pub(crate) use debug_assert_tail_not_past_head;
