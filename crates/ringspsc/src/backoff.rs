use std::hint;
use std::thread;

/// Adaptive backoff for callers that retry a full or empty ring.
///
/// The ring never waits on its own. This is the waiting policy a caller can
/// layer on top: spin with PAUSE hints, then yield to the OS, then report
/// completion so the caller can park or give up.
///
/// ```
/// use ringspsc_rs::{bounded, Backoff};
///
/// let (mut tx, mut rx) = bounded::<u32>(4).unwrap();
/// tx.push(7).unwrap();
///
/// let mut backoff = Backoff::new();
/// let value = loop {
///     if let Some(v) = rx.pop() {
///         break v;
///     }
///     backoff.snooze();
/// };
/// assert_eq!(value, 7);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Backoff {
    step: u32,
    limit: u32,
}

impl Backoff {
    /// Steps that spin; each one doubles the spin count, up to 2^6 = 64.
    pub const SPIN_LIMIT: u32 = 6;
    /// Default number of steps before [`is_completed`](Self::is_completed).
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Creates a backoff that spins, yields a few times, then completes.
    #[inline]
    pub const fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT)
    }

    /// Creates a backoff that completes after `limit` steps.
    ///
    /// A limit at or below [`SPIN_LIMIT`](Self::SPIN_LIMIT) never yields, so
    /// the caller parks straight after a short spin. Larger limits add one
    /// `yield_now` per extra step, which keeps a latency-sensitive waiter off
    /// the condvar for longer.
    #[inline]
    pub const fn with_limit(limit: u32) -> Self {
        Self { step: 0, limit }
    }

    /// Light spin with PAUSE hints.
    #[inline]
    pub fn spin(&mut self) {
        let spins = 1u32 << self.step.min(Self::SPIN_LIMIT);
        for _ in 0..spins {
            hint::spin_loop();
        }
        if self.step <= Self::SPIN_LIMIT {
            self.step += 1;
        }
    }

    /// Spin while the spin budget lasts, then yield to the OS.
    #[inline]
    pub fn snooze(&mut self) {
        if self.step <= Self::SPIN_LIMIT {
            self.spin();
        } else {
            thread::yield_now();
            if self.step <= self.limit {
                self.step = self.step.saturating_add(1);
            }
        }
    }

    /// Returns true once the step budget is used up.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.step > self.limit
    }

    /// Reset after a successful push or pop.
    #[inline]
    pub fn reset(&mut self) {
        self.step = 0;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_progression() {
        let mut b = Backoff::new();
        assert_eq!(b.step, 0);

        b.spin();
        assert!(b.step > 0);

        // spin() alone saturates at SPIN_LIMIT + 1 and never completes
        for _ in 0..32 {
            b.spin();
        }
        assert_eq!(b.step, Backoff::SPIN_LIMIT + 1);
        assert!(!b.is_completed());

        while !b.is_completed() {
            b.snooze();
        }
        assert_eq!(b.step, Backoff::DEFAULT_LIMIT + 1);

        b.reset();
        assert_eq!(b.step, 0);
        assert!(!b.is_completed());
    }

    #[test]
    fn test_short_limit_completes_without_yielding() {
        let mut b = Backoff::with_limit(2);
        let mut snoozes = 0;
        while !b.is_completed() {
            b.snooze();
            snoozes += 1;
        }
        // Every step was a spin step.
        assert_eq!(snoozes, 3);
        assert!(b.step <= Backoff::SPIN_LIMIT);
    }

    #[test]
    fn test_long_limit_adds_yield_steps() {
        let count = |limit| {
            let mut b = Backoff::with_limit(limit);
            let mut snoozes = 0;
            while !b.is_completed() {
                b.snooze();
                snoozes += 1;
            }
            snoozes
        };
        assert_eq!(count(Backoff::DEFAULT_LIMIT + 4), count(Backoff::DEFAULT_LIMIT) + 4);
    }
}
