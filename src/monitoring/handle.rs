//! A concrete, `Clone`-able monitor handle that switches between
//! [`InMemoryMonitor`] and [`NoopMonitor`] at construction time.
//!
//! [`Monitor`] itself cannot be used as a `dyn` trait object (its `Clone`
//! bound rules that out), and every call site that wants to record an
//! event just wants "the configured monitor for this event family",
//! not a compile-time choice of implementation. `MonitorHandle` is that
//! runtime choice, picked once when a [`crate::vm::Vm`] or
//! [`crate::tvar::Space`] is built from a [`crate::system::SystemConfig`].

use super::error::MonitoringError;
use super::in_memory::InMemoryMonitor;
use super::noop::NoopMonitor;
use super::traits::{Monitor, MonitoringEvent};
use super::types::{MonitoringConfig, MonitoringSnapshot};

/// Either a recording [`InMemoryMonitor`] or a zero-cost [`NoopMonitor`],
/// chosen once at construction by [`MonitorHandle::new`].
#[derive(Debug, Clone)]
pub enum MonitorHandle<E: MonitoringEvent> {
    /// Monitoring enabled: events are recorded and counted.
    InMemory(InMemoryMonitor<E>),
    /// Monitoring disabled: every call is a no-op.
    Noop(NoopMonitor<E>),
}

impl<E: MonitoringEvent> MonitorHandle<E> {
    /// Build a handle: an in-memory monitor with default config if
    /// `enabled`, a no-op monitor otherwise.
    pub fn new(enabled: bool) -> Self {
        if enabled {
            MonitorHandle::InMemory(InMemoryMonitor::new(MonitoringConfig::default()))
        } else {
            MonitorHandle::Noop(NoopMonitor::new())
        }
    }
}

impl<E: MonitoringEvent> Default for MonitorHandle<E> {
    /// Disabled by default, matching [`crate::system::config::DEFAULT_ENABLE_MONITORING`].
    fn default() -> Self {
        MonitorHandle::new(false)
    }
}

impl<E: MonitoringEvent> Monitor<E> for MonitorHandle<E> {
    fn record(&self, event: E) -> Result<(), MonitoringError> {
        match self {
            MonitorHandle::InMemory(m) => m.record(event),
            MonitorHandle::Noop(m) => m.record(event),
        }
    }

    fn snapshot(&self) -> Result<MonitoringSnapshot<E>, MonitoringError> {
        match self {
            MonitorHandle::InMemory(m) => m.snapshot(),
            MonitorHandle::Noop(m) => m.snapshot(),
        }
    }

    fn reset(&self) -> Result<(), MonitoringError> {
        match self {
            MonitorHandle::InMemory(m) => m.reset(),
            MonitorHandle::Noop(m) => m.reset(),
        }
    }
}
