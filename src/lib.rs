//! # ractor-rt — an in-process Actor isolation runtime
//!
//! Each Actor is a native OS thread with its own heap of object handles;
//! the only way values cross from one Actor to another is through this
//! crate's rendezvous primitives, which classify every value as
//! shareable, copy-by-marshal, or move-by-ownership-transfer before it is
//! allowed to leave its Actor.
//!
//! # Quick Start
//!
//! ```rust
//! use ractor_rt::prelude::*;
//!
//! let runtime = Runtime::new();
//! let mut handle = runtime.spawn(None, |ctx| ctx.receive());
//! runtime.send(handle.actor(), RValue::Int(1)).unwrap();
//! handle.join();
//! ```
//!
//! # Core Features
//!
//! ## Isolation
//! - One incoming port per Actor, one outgoing rendezvous slot
//! - Values are classified, never silently shared, when they cross an
//!   Actor boundary
//! - A debug-only belonging check catches a moved value read from the
//!   wrong Actor
//!
//! ## Rendezvous
//! - `send`/`receive` for async, queued delivery
//! - `yield`/`take` for synchronous, zero-capacity handoff
//! - `select` over any mix of both, with an optional fairness shuffle
//!
//! ## Shared Transactional Memory
//! - T-Vars read and written inside optimistic, retrying transactions
//! - `Lock`/`LVar` built directly on the same transactional substrate
//! - An explicit bulk-lock mode for callers that need several T-Vars
//!   updated atomically without the retry loop
//!
//! # Module Organization
//!
//! ## Core Actor System
//! - [`actor`] - the isolated Actor: lifecycle, incoming queue, wait
//!   state, and native-thread spawn
//! - [`rendezvous`] - `send`/`receive`/`yield`/`take`/`select`
//! - [`classify`] - the object classifier and the belonging check
//! - [`value`] - the value representation moved and classified across
//!   Actor boundaries
//! - [`basket`] - the envelope a value travels in while crossing
//! - [`queue`] - the per-Actor incoming FIFO
//! - [`wait`] - the wait/wakeup state machine every blocking call parks on
//!
//! ## Shared Memory
//! - [`tvar`] - the transactional memory area: `Space`, `Transaction`,
//!   `Lock`, `LVar`
//!
//! ## Infrastructure
//! - [`vm`] - the Actor registry, the recursive global lock, and the
//!   stop-the-world barrier
//! - [`system`] - [`system::Runtime`] configuration and construction
//! - [`monitoring`] - event tracking for observability
//! - [`util`] - identifiers (`ActorId`, `SlotIndex`, `MessageSeq`)
//! - [`error`] - the runtime-wide error type

pub mod actor;
pub mod basket;
pub mod classify;
pub mod error;
pub mod monitoring;
pub mod prelude;
pub mod queue;
pub mod rendezvous;
pub mod system;
pub mod tvar;
pub mod util;
pub mod value;
pub mod vm;
pub mod wait;

// Re-export commonly used types
pub use actor::{spawn_worker, Actor, ActorHandle, ActorInner, ActorLifecycle, ActorStatus};
pub use basket::{Basket, BasketKind};
pub use error::RactorError;
pub use monitoring::{
    ActorEvent, ActorEventKind, EventSeverity, InMemoryMonitor, Monitor, MonitorHandle,
    MonitoringConfig, MonitoringError, MonitoringEvent, MonitoringSnapshot, NoopMonitor,
    RendezvousEvent, RendezvousEventKind, SystemEvent, SystemEventKind, TransactionEvent,
    TransactionEventKind,
};
pub use rendezvous::{Ctx, SelectArm, SelectOutcome, YieldPayload};
pub use system::{SystemConfig, SystemError};
pub use tvar::{Lock, LVar, Space, Transaction};
pub use util::{ActorId, MessageSeq, SlotIndex};
pub use value::{Handle, RValue};
pub use vm::Vm;
