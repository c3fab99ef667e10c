//! Configuration for waiting behavior.

use ringspsc_rs::Backoff;
use std::time::Duration;

/// How a blocked sender or receiver waits for the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Spin and yield (see [`ringspsc_rs::Backoff`]) before parking.
    ///
    /// Default: true
    pub spin_before_park: bool,

    /// Backoff steps before parking when `spin_before_park` is set.
    ///
    /// The first 7 steps spin; each step past that yields once. See
    /// [`ringspsc_rs::Backoff::with_limit`].
    ///
    /// Default: [`ringspsc_rs::Backoff::DEFAULT_LIMIT`]
    pub backoff_limit: u32,

    /// Upper bound on a single park.
    ///
    /// Wakeups are event-driven; this interval is a safety net so a waiter
    /// re-checks the ring even if a notification is missed.
    ///
    /// Default: 10ms
    pub park_timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            spin_before_park: true,
            backoff_limit: Backoff::DEFAULT_LIMIT,
            park_timeout: Duration::from_millis(10),
        }
    }
}

impl WaitConfig {
    /// Creates a low-latency configuration: yields longer before parking and
    /// parks for shorter intervals.
    pub fn low_latency() -> Self {
        Self {
            spin_before_park: true,
            backoff_limit: Backoff::DEFAULT_LIMIT + 10,
            park_timeout: Duration::from_millis(1),
        }
    }

    /// Creates a CPU-friendly configuration that parks immediately.
    pub fn high_throughput() -> Self {
        Self {
            spin_before_park: false,
            backoff_limit: Backoff::SPIN_LIMIT,
            park_timeout: Duration::from_millis(50),
        }
    }

    /// Sets whether to spin before parking.
    pub fn with_spin_before_park(mut self, spin: bool) -> Self {
        self.spin_before_park = spin;
        self
    }

    /// Sets the number of backoff steps before parking.
    pub fn with_backoff_limit(mut self, limit: u32) -> Self {
        self.backoff_limit = limit;
        self
    }

    /// Sets the park timeout.
    pub fn with_park_timeout(mut self, timeout: Duration) -> Self {
        self.park_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_order_backoff_budget() {
        let low = WaitConfig::low_latency();
        let default = WaitConfig::default();
        assert!(low.backoff_limit > default.backoff_limit);
        assert!(low.park_timeout < default.park_timeout);
        assert!(!WaitConfig::high_throughput().spin_before_park);

        let custom = default.with_backoff_limit(3).with_spin_before_park(false);
        assert_eq!(custom.backoff_limit, 3);
        assert!(!custom.spin_before_park);
        assert_eq!(custom.park_timeout, default.park_timeout);
    }
}
