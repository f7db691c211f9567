//! Monitoring event types and configuration structures.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::traits::{EventSeverity, MonitoringEvent};
use crate::util::ActorId;

/// Configuration for monitoring behavior.
///
/// Controls how events are recorded, filtered, and stored in the monitor.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringConfig {
    /// Whether monitoring is enabled
    pub enabled: bool,

    /// Maximum number of events to keep in history
    pub max_history_size: usize,

    /// Minimum severity level to record (events below this are filtered)
    pub severity_filter: EventSeverity,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history_size: 1000,
            severity_filter: EventSeverity::Info,
        }
    }
}

/// Snapshot of monitoring state at a point in time.
///
/// Provides queryable access to monitoring counters and recent event history.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSnapshot<E: MonitoringEvent> {
    /// Timestamp when snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Total number of events recorded
    pub total_events: u64,

    /// Number of trace-level events
    pub trace_count: u64,

    /// Number of debug-level events
    pub debug_count: u64,

    /// Number of info-level events
    pub info_count: u64,

    /// Number of warning-level events
    pub warning_count: u64,

    /// Number of error-level events
    pub error_count: u64,

    /// Number of critical-level events
    pub critical_count: u64,

    /// Recent events (up to max_history_size)
    pub recent_events: Vec<E>,
}

// ============================================================================
// Actor Events
// ============================================================================

/// Events related to Actor lifecycle (C6).
#[derive(Debug, Clone, Serialize)]
pub struct ActorEvent {
    /// Timestamp when event occurred
    pub timestamp: DateTime<Utc>,

    /// ID of the Actor
    pub actor_id: ActorId,

    /// Specific Actor event type
    pub event_kind: ActorEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for ActorEvent {
    const EVENT_TYPE: &'static str = "actor";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            ActorEventKind::Spawned => EventSeverity::Debug,
            ActorEventKind::Running => EventSeverity::Trace,
            ActorEventKind::Terminated => EventSeverity::Info,
            ActorEventKind::Panicked { .. } => EventSeverity::Error,
        }
    }
}

/// Specific types of Actor events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ActorEventKind {
    /// A new Actor was registered in the VM and its worker thread started.
    Spawned,

    /// The Actor resumed running after a blocking rendezvous call.
    Running,

    /// The Actor's body returned and its incoming port was closed.
    Terminated,

    /// The Actor's body panicked; the panic was converted into an
    /// exception basket on its outgoing slot.
    Panicked {
        /// The panic payload, stringified.
        cause: String,
    },
}

// ============================================================================
// Rendezvous Events
// ============================================================================

/// Events related to the rendezvous engine (C5): incoming-port traffic and
/// blocking/waking on `send`/`receive`/`yield`/`take`/`select`.
#[derive(Debug, Clone, Serialize)]
pub struct RendezvousEvent {
    /// Timestamp when event occurred
    pub timestamp: DateTime<Utc>,

    /// ID of the Actor whose port or wait state this event describes
    pub actor_id: ActorId,

    /// Specific rendezvous event type
    pub event_kind: RendezvousEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for RendezvousEvent {
    const EVENT_TYPE: &'static str = "rendezvous";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            RendezvousEventKind::Enqueued { .. } => EventSeverity::Trace,
            RendezvousEventKind::Dequeued { .. } => EventSeverity::Trace,
            RendezvousEventKind::Blocked { .. } => EventSeverity::Debug,
            RendezvousEventKind::Woken { .. } => EventSeverity::Trace,
            RendezvousEventKind::PortClosed => EventSeverity::Info,
            RendezvousEventKind::SendRejected => EventSeverity::Warning,
        }
    }
}

/// Specific types of rendezvous events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum RendezvousEventKind {
    /// A basket was pushed onto the Actor's incoming port.
    Enqueued {
        /// Queue length after the push
        queue_len: usize,
    },

    /// A basket was popped off the Actor's incoming port.
    Dequeued {
        /// Queue length after the pop
        queue_len: usize,
    },

    /// The Actor parked on a blocking rendezvous call.
    Blocked {
        /// Which wait mask it parked on, as a debug string
        wait_mask: String,
    },

    /// The Actor was woken from a blocking rendezvous call.
    Woken {
        /// Why it was woken, as a debug string
        reason: String,
    },

    /// The Actor's incoming port was closed.
    PortClosed,

    /// A `send` targeting this Actor was rejected because its port was
    /// already closed.
    SendRejected,
}

// ============================================================================
// System Events
// ============================================================================

/// Events related to VM-level operations: the actor registry and the
/// stop-the-world barrier (C7).
#[derive(Debug, Clone, Serialize)]
pub struct SystemEvent {
    /// Timestamp when event occurred
    pub timestamp: DateTime<Utc>,

    /// Specific system event type
    pub event_kind: SystemEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for SystemEvent {
    const EVENT_TYPE: &'static str = "system";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SystemEventKind::ActorRegistered { .. } => EventSeverity::Debug,
            SystemEventKind::ActorDeregistered { .. } => EventSeverity::Debug,
            SystemEventKind::BarrierEntered => EventSeverity::Debug,
            SystemEventKind::BarrierExited => EventSeverity::Debug,
            SystemEventKind::ShutdownInitiated => EventSeverity::Info,
        }
    }
}

/// Specific types of system events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SystemEventKind {
    /// An Actor was registered with the VM.
    ActorRegistered {
        /// ID of the registered Actor
        actor_id: ActorId,
    },

    /// An Actor was retired from the VM's registry.
    ActorDeregistered {
        /// ID of the deregistered Actor
        actor_id: ActorId,
    },

    /// A stop-the-world barrier started waiting for every Actor to pause.
    BarrierEntered,

    /// A stop-the-world barrier's protected closure finished running.
    BarrierExited,

    /// `Vm::terminate_all` was called.
    ShutdownInitiated,
}

// ============================================================================
// Transaction Events
// ============================================================================

/// Events related to the transactional memory area (C8).
#[derive(Debug, Clone, Serialize)]
pub struct TransactionEvent {
    /// Timestamp when event occurred
    pub timestamp: DateTime<Utc>,

    /// Specific transaction event type
    pub event_kind: TransactionEventKind,

    /// Additional event metadata
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for TransactionEvent {
    const EVENT_TYPE: &'static str = "transaction";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            TransactionEventKind::Committed { .. } => EventSeverity::Trace,
            TransactionEventKind::Retried => EventSeverity::Debug,
            TransactionEventKind::BulkLockAcquired { .. } => EventSeverity::Debug,
        }
    }
}

/// Specific types of transaction events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum TransactionEventKind {
    /// `Space::atomically` committed successfully.
    Committed {
        /// Number of retries before this commit succeeded
        retries: u32,
    },

    /// A commit attempt lost the optimistic race (version mismatch) or the
    /// body called `Transaction::retry` explicitly, and will try again.
    Retried,

    /// `Space::lock_all` acquired every requested slot.
    BulkLockAcquired {
        /// Number of slots locked
        slot_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor_id() -> ActorId {
        ActorId::from_raw(7)
    }

    #[test]
    fn monitoring_config_defaults() {
        let config = MonitoringConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_history_size, 1000);
        assert_eq!(config.severity_filter, EventSeverity::Info);
    }

    #[test]
    fn actor_event_severity() {
        let event = ActorEvent {
            timestamp: Utc::now(),
            actor_id: actor_id(),
            event_kind: ActorEventKind::Terminated,
            metadata: HashMap::new(),
        };
        assert_eq!(event.severity(), EventSeverity::Info);
        assert_eq!(ActorEvent::EVENT_TYPE, "actor");
    }

    #[test]
    fn actor_panic_event_is_an_error() {
        let event = ActorEvent {
            timestamp: Utc::now(),
            actor_id: actor_id(),
            event_kind: ActorEventKind::Panicked {
                cause: "boom".into(),
            },
            metadata: HashMap::new(),
        };
        assert_eq!(event.severity(), EventSeverity::Error);
    }

    #[test]
    fn rendezvous_event_severity() {
        let event = RendezvousEvent {
            timestamp: Utc::now(),
            actor_id: actor_id(),
            event_kind: RendezvousEventKind::SendRejected,
            metadata: HashMap::new(),
        };
        assert_eq!(event.severity(), EventSeverity::Warning);
        assert_eq!(RendezvousEvent::EVENT_TYPE, "rendezvous");
    }

    #[test]
    fn system_event_severity() {
        let event = SystemEvent {
            timestamp: Utc::now(),
            event_kind: SystemEventKind::ShutdownInitiated,
            metadata: HashMap::new(),
        };
        assert_eq!(event.severity(), EventSeverity::Info);
        assert_eq!(SystemEvent::EVENT_TYPE, "system");
    }

    #[test]
    fn transaction_event_severity() {
        let event = TransactionEvent {
            timestamp: Utc::now(),
            event_kind: TransactionEventKind::Committed { retries: 2 },
            metadata: HashMap::new(),
        };
        assert_eq!(event.severity(), EventSeverity::Trace);
        assert_eq!(TransactionEvent::EVENT_TYPE, "transaction");
    }

    #[test]
    fn monitoring_snapshot_creation() {
        let snapshot = MonitoringSnapshot::<ActorEvent> {
            timestamp: Utc::now(),
            total_events: 100,
            trace_count: 10,
            debug_count: 20,
            info_count: 30,
            warning_count: 25,
            error_count: 10,
            critical_count: 5,
            recent_events: vec![],
        };

        assert_eq!(snapshot.total_events, 100);
        assert_eq!(snapshot.trace_count, 10);
        assert_eq!(snapshot.critical_count, 5);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn event_metadata_roundtrips() {
        let mut metadata = HashMap::new();
        metadata.insert("custom_key".to_string(), "custom_value".to_string());

        let event = SystemEvent {
            timestamp: Utc::now(),
            event_kind: SystemEventKind::BarrierEntered,
            metadata,
        };

        assert_eq!(
            event.metadata.get("custom_key").expect("key should exist"),
            "custom_value"
        );
    }
}
