//! No-operation monitor implementation with zero overhead.

use std::marker::PhantomData;

use chrono::Utc;

use super::error::MonitoringError;
use super::traits::{Monitor, MonitoringEvent};
use super::types::MonitoringSnapshot;

/// No-operation monitor that discards all events with zero overhead.
///
/// This monitor is optimized for production scenarios where monitoring is disabled
/// but the monitoring infrastructure must remain in place. All methods are
/// inlined and compile to near-zero overhead.
///
/// # Zero-Cost Abstraction
///
/// All methods are marked `#[inline(always)]` to ensure complete optimization:
/// - No heap allocations
/// - No atomic operations
/// - No lock contention
/// - Minimal stack usage
///
/// # Examples
///
/// ```
/// use ractor_rt::monitoring::{NoopMonitor, Monitor, ActorEvent};
///
/// let monitor = NoopMonitor::<ActorEvent>::new();
/// let snapshot = monitor.snapshot().unwrap();
/// assert_eq!(snapshot.total_events, 0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor<E: MonitoringEvent> {
    _phantom: PhantomData<E>,
}

impl<E: MonitoringEvent> NoopMonitor<E> {
    /// Creates a new no-operation monitor.
    ///
    /// # Examples
    ///
    /// ```
    /// use ractor_rt::monitoring::{NoopMonitor, ActorEvent};
    ///
    /// let monitor = NoopMonitor::<ActorEvent>::new();
    /// ```
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<E: MonitoringEvent> Monitor<E> for NoopMonitor<E> {
    /// Records an event (no-op, always succeeds with zero overhead).
    #[inline(always)]
    fn record(&self, _event: E) -> Result<(), MonitoringError> {
        Ok(())
    }

    /// Returns an empty snapshot (no-op, zero counters).
    #[inline(always)]
    fn snapshot(&self) -> Result<MonitoringSnapshot<E>, MonitoringError> {
        Ok(MonitoringSnapshot {
            timestamp: Utc::now(),
            total_events: 0,
            trace_count: 0,
            debug_count: 0,
            info_count: 0,
            warning_count: 0,
            error_count: 0,
            critical_count: 0,
            recent_events: Vec::new(),
        })
    }

    /// Resets monitor state (no-op, always succeeds with zero overhead).
    #[inline(always)]
    fn reset(&self) -> Result<(), MonitoringError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::monitoring::types::{ActorEvent, ActorEventKind};
    use crate::util::ActorId;

    fn create_test_event() -> ActorEvent {
        ActorEvent {
            timestamp: Utc::now(),
            actor_id: ActorId::from_raw(1),
            event_kind: ActorEventKind::Spawned,
            metadata: HashMap::new(),
        }
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn noop_creation() {
        let monitor = NoopMonitor::<ActorEvent>::new();
        let snapshot = monitor.snapshot().expect("snapshot should succeed");
        assert_eq!(snapshot.total_events, 0);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn noop_default() {
        let monitor = NoopMonitor::<ActorEvent>::default();
        let snapshot = monitor.snapshot().expect("snapshot should succeed");
        assert_eq!(snapshot.total_events, 0);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn noop_record_ignores_events() {
        let monitor = NoopMonitor::new();

        for _ in 0..100 {
            let event = create_test_event();
            monitor.record(event).expect("record should succeed");
        }

        let snapshot = monitor.snapshot().expect("snapshot should succeed");
        assert_eq!(snapshot.total_events, 0);
        assert_eq!(snapshot.recent_events.len(), 0);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn noop_snapshot_always_empty() {
        let monitor = NoopMonitor::<ActorEvent>::new();

        let snapshot = monitor.snapshot().expect("snapshot should succeed");
        assert_eq!(snapshot.total_events, 0);
        assert_eq!(snapshot.trace_count, 0);
        assert_eq!(snapshot.debug_count, 0);
        assert_eq!(snapshot.info_count, 0);
        assert_eq!(snapshot.warning_count, 0);
        assert_eq!(snapshot.error_count, 0);
        assert_eq!(snapshot.critical_count, 0);
        assert_eq!(snapshot.recent_events.len(), 0);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn noop_reset_always_succeeds() {
        let monitor = NoopMonitor::<ActorEvent>::new();

        monitor.reset().expect("reset should succeed");

        let snapshot = monitor.snapshot().expect("snapshot should succeed");
        assert_eq!(snapshot.total_events, 0);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn noop_clone() {
        let monitor1 = NoopMonitor::<ActorEvent>::new();
        let monitor2 = monitor1.clone();

        let snapshot1 = monitor1.snapshot().expect("snapshot should succeed");
        let snapshot2 = monitor2.snapshot().expect("snapshot should succeed");

        assert_eq!(snapshot1.total_events, snapshot2.total_events);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn noop_zero_overhead_trait_impl() {
        let monitor = NoopMonitor::<ActorEvent>::new();

        let event = create_test_event();
        monitor.record(event).expect("record should succeed");
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn noop_concurrent_safety() {
        std::thread::scope(|scope| {
            for _ in 0..10 {
                scope.spawn(|| {
                    let local_monitor = NoopMonitor::<ActorEvent>::new();
                    for _ in 0..10 {
                        let event = create_test_event();
                        local_monitor
                            .record(event)
                            .expect("record should succeed");
                    }
                    let snapshot = local_monitor.snapshot().expect("snapshot should succeed");
                    assert_eq!(snapshot.total_events, 0);
                });
            }
        });
    }
}
