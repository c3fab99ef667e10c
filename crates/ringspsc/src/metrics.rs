use crate::sync::atomic::{AtomicU64, Ordering};
use crossbeam_utils::CachePadded;

/// Optional counters for monitoring ring traffic.
///
/// Producer-side and consumer-side counters live on separate cache lines so
/// that enabling metrics does not reintroduce false sharing between the two
/// threads. Every counter has exactly one writer; updates are `Relaxed`.
#[derive(Debug)]
pub(crate) struct Metrics {
    producer: CachePadded<ProducerCounters>,
    consumer: CachePadded<ConsumerCounters>,
}

#[derive(Debug)]
struct ProducerCounters {
    pushed: AtomicU64,
    push_full: AtomicU64,
}

#[derive(Debug)]
struct ConsumerCounters {
    popped: AtomicU64,
    pop_empty: AtomicU64,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self {
            producer: CachePadded::new(ProducerCounters {
                pushed: AtomicU64::new(0),
                push_full: AtomicU64::new(0),
            }),
            consumer: CachePadded::new(ConsumerCounters {
                popped: AtomicU64::new(0),
                pop_empty: AtomicU64::new(0),
            }),
        }
    }

    #[inline]
    pub(crate) fn add_pushed(&self, n: u64) {
        self.producer.pushed.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_push_full(&self) {
        self.producer.push_full.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_popped(&self, n: u64) {
        self.consumer.popped.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_pop_empty(&self) {
        self.consumer.pop_empty.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            items_pushed: self.producer.pushed.load(Ordering::Relaxed),
            push_full: self.producer.push_full.load(Ordering::Relaxed),
            items_popped: self.consumer.popped.load(Ordering::Relaxed),
            pop_empty: self.consumer.pop_empty.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the ring counters.
///
/// Like `len()`, a snapshot taken while both threads run is stale the moment
/// it is returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Items successfully pushed.
    pub items_pushed: u64,
    /// Pushes rejected because the ring was full.
    pub push_full: u64,
    /// Items successfully popped.
    pub items_popped: u64,
    /// Pops that found the ring empty.
    pub pop_empty: u64,
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let m = Metrics::new();
        m.add_pushed(3);
        m.add_push_full();
        m.add_popped(2);
        m.add_pop_empty();
        m.add_pop_empty();

        assert_eq!(
            m.snapshot(),
            MetricsSnapshot {
                items_pushed: 3,
                push_full: 1,
                items_popped: 2,
                pop_empty: 2,
            }
        );
    }
}
