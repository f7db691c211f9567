//! # Monitoring Module
//!
//! Universal monitoring infrastructure for observing and tracking events across all runtime components.
//!
//! ## Features
//! - **Generic Monitor<E> Trait**: Universal monitoring for any entity type
//! - **Zero-Cost Abstraction**: NoopMonitor compiles away when disabled
//! - **Lock-Free Recording**: Atomic counters for concurrent event tracking
//! - **Type Safety**: MonitoringEvent trait ensures compile-time correctness
//!
//! ## Event Types
//! - `ActorEvent`: Actor lifecycle (spawn, run, termination, panic)
//! - `RendezvousEvent`: incoming-port traffic and blocking/waking on a rendezvous call
//! - `SystemEvent`: VM registry and stop-the-world barrier activity
//! - `TransactionEvent`: T-Var transaction commits, retries, bulk-lock acquisition
//!
//! ## Examples
//! ```
//! use ractor_rt::monitoring::{InMemoryMonitor, Monitor, MonitoringConfig, ActorEvent, ActorEventKind};
//! use ractor_rt::util::ActorId;
//! use chrono::Utc;
//! use std::collections::HashMap;
//!
//! let config = MonitoringConfig::default();
//! let monitor = InMemoryMonitor::new(config);
//!
//! let event = ActorEvent {
//!     timestamp: Utc::now(),
//!     actor_id: ActorId::from_raw(1),
//!     event_kind: ActorEventKind::Spawned,
//!     metadata: HashMap::new(),
//! };
//! monitor.record(event).unwrap();
//!
//! let snapshot = monitor.snapshot().unwrap();
//! assert_eq!(snapshot.total_events, 1);
//! ```

pub mod error;
pub mod handle;
pub mod in_memory;
pub mod noop;
pub mod traits;
pub mod types;

pub use error::MonitoringError;
pub use handle::MonitorHandle;
pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use traits::{EventSeverity, Monitor, MonitoringEvent};
pub use types::{
    ActorEvent, ActorEventKind, MonitoringConfig, MonitoringSnapshot, RendezvousEvent,
    RendezvousEventKind, SystemEvent, SystemEventKind, TransactionEvent, TransactionEventKind,
};
