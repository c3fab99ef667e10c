use crate::RingError;

/// Configuration for [`RingBuffer`](crate::RingBuffer) and the SPSC handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of slots. Must be a non-zero power of two.
    pub capacity: usize,
    /// Enable metrics collection (slight overhead)
    pub enable_metrics: bool,
}

impl Config {
    /// Creates a new configuration with custom settings.
    ///
    /// The capacity is checked when a ring is built from this config, see
    /// [`Config::validate`].
    pub const fn new(capacity: usize, enable_metrics: bool) -> Self {
        Self {
            capacity,
            enable_metrics,
        }
    }

    /// Creates a configuration with `1 << bits` slots.
    ///
    /// Always yields a valid power-of-two capacity.
    pub const fn from_bits(bits: u8) -> Self {
        Self::new(1 << bits, false)
    }

    /// Enables or disables metrics.
    pub const fn with_metrics(mut self, enable_metrics: bool) -> Self {
        self.enable_metrics = enable_metrics;
        self
    }

    /// Checks that the capacity is a non-zero power of two.
    pub const fn validate(&self) -> Result<(), RingError> {
        // is_power_of_two() is false for 0
        if self.capacity.is_power_of_two() {
            Ok(())
        } else {
            Err(RingError::InvalidCapacity {
                capacity: self.capacity,
            })
        }
    }

    /// Returns the mask for index wrapping.
    #[inline]
    pub const fn mask(&self) -> usize {
        self.capacity.wrapping_sub(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1 << 16, // 64K slots
            enable_metrics: false,
        }
    }
}

/// Low latency configuration (4K slots, fits in L1 cache)
pub const LOW_LATENCY_CONFIG: Config = Config::from_bits(12);

/// High throughput configuration (1M slots)
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::from_bits(20);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_and_non_powers() {
        for capacity in [0, 3, 5, 6, 100, 1000] {
            assert_eq!(
                Config::new(capacity, false).validate(),
                Err(RingError::InvalidCapacity { capacity })
            );
        }
    }

    #[test]
    fn test_validate_accepts_powers_of_two() {
        for capacity in [1, 2, 4, 1024, 1 << 20] {
            assert!(Config::new(capacity, false).validate().is_ok());
        }
    }

    #[test]
    fn test_presets() {
        assert_eq!(Config::default().capacity, 65_536);
        assert_eq!(LOW_LATENCY_CONFIG.capacity, 4096);
        assert_eq!(HIGH_THROUGHPUT_CONFIG.capacity, 1 << 20);
        assert_eq!(Config::from_bits(3).mask(), 7);
        assert!(Config::from_bits(0).with_metrics(true).enable_metrics);
    }
}
