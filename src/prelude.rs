//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for building
//! against ractor-rt. Import it to get started quickly:
//!
//! ```rust
//! use ractor_rt::prelude::*;
//! ```
//!
//! # What's Included
//!
//! ## Core Actor System
//! - [`Actor`] - the isolated Actor state every rendezvous call locks
//! - [`ActorHandle`] / [`spawn_worker`] - native-thread spawn and join
//! - [`ActorLifecycle`] / [`ActorStatus`] - lifecycle tracking
//!
//! ## Rendezvous
//! - [`Ctx`] - `send`/`receive`/`yield`/`take`/`select`, bound to one Actor
//! - [`SelectArm`] / [`SelectOutcome`] / [`YieldPayload`] - `select` inputs
//!   and outputs
//!
//! ## Values
//! - [`RValue`] - the value representation moved between Actors
//! - [`Handle`] - the heap-identity handle a `move` invalidates
//!
//! ## Transactional Memory
//! - [`Space`] - the T-Var area
//! - [`Transaction`] - the read-set/write-set a transaction body runs in
//! - [`Lock`] / [`LVar`] - the two primitives built on a T-Var slot
//!
//! ## Runtime
//! - [`Runtime`] - one [`Vm`] plus one [`Space`], built from a
//!   [`SystemConfig`]
//! - [`SystemConfig`] - runtime-wide configuration
//! - [`Vm`] - the Actor registry, global lock, and shutdown barrier
//!
//! ## Monitoring
//! - [`Monitor`] - Core monitoring trait
//! - [`InMemoryMonitor`] - Production monitor
//! - [`NoopMonitor`] - Zero-overhead no-op monitor
//! - [`MonitoringEvent`] - Trait for events
//! - [`EventSeverity`] - Event severity levels
//! - [`ActorEvent`] - Actor lifecycle events
//! - [`SystemEvent`] - VM-level events
//!
//! ## Errors
//! - [`RactorError`] - the error every rendezvous call returns
//!
//! # Example
//!
//! ```rust
//! use ractor_rt::prelude::*;
//!
//! let runtime = Runtime::new();
//! let mut handle = runtime.spawn(None, |ctx| {
//!     let v = ctx.receive()?;
//!     ctx.yield_value(v)
//! });
//! runtime.send(handle.actor(), RValue::Int(1)).unwrap();
//! handle.join();
//! ```

// Core actor system
pub use crate::actor::{spawn_worker, Actor, ActorHandle, ActorLifecycle, ActorStatus};

// Rendezvous
pub use crate::rendezvous::{Ctx, SelectArm, SelectOutcome, YieldPayload};

// Values
pub use crate::value::{Handle, RValue};

// Transactional memory
pub use crate::tvar::{Lock, Space, Transaction, LVar};

// Runtime
pub use crate::system::{Runtime, SystemConfig};
pub use crate::vm::Vm;

// Monitoring
pub use crate::monitoring::{
    ActorEvent, EventSeverity, InMemoryMonitor, Monitor, MonitoringEvent, NoopMonitor, SystemEvent,
};

// Errors
pub use crate::error::RactorError;

// Utilities
pub use crate::util::ActorId;
