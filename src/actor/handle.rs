//! Spawning an Actor's worker thread.
//!
//! The source system backs every Actor with a native thread (a Ruby
//! Ractor has no green-thread scheduler of its own); `spawn_worker` keeps
//! that mapping literally, using `std::thread::Builder` instead of a
//! Tokio task.

// Layer 1: Standard library imports
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::thread::JoinHandle;

// Layer 2: Third-party crate imports
use chrono::Utc;

// Layer 3: Internal module imports
use super::core::Actor;
use super::lifecycle::ActorStatus;
use crate::basket::{Basket, BasketKind};
use crate::error::RactorError;
use crate::monitoring::{ActorEvent, ActorEventKind, Monitor};
use crate::util::MessageSeq;
use crate::value::RValue;
use crate::vm::Vm;

/// A handle to a spawned Actor: its shared [`Actor`] state plus the
/// `JoinHandle` of the native thread running its body.
#[derive(Debug)]
pub struct ActorHandle {
    actor: Arc<Actor>,
    join: Option<JoinHandle<()>>,
}

impl ActorHandle {
    /// The underlying Actor.
    pub fn actor(&self) -> &Arc<Actor> {
        &self.actor
    }

    /// Block until the worker thread exits. A no-op if already joined.
    pub fn join(&mut self) {
        if let Some(handle) = self.join.take() {
            let _ = handle.join();
        }
    }
}

/// Spawn a new Actor whose body is `body`. The body runs with the global
/// running-count incremented for its whole duration except while the
/// rendezvous calls it makes internally mark it paused; its return value
/// (or panic) becomes the basket a `take` on this Actor's outgoing port
/// receives.
///
/// Grounded on `ractor.c`'s `ractor_create` + the pthread it spawns for
/// the new Ractor.
pub fn spawn_worker<F>(vm: Arc<Vm>, name: Option<Arc<str>>, body: F) -> ActorHandle
where
    F: FnOnce(Arc<Actor>, Arc<Vm>) -> Result<RValue, RactorError> + Send + 'static,
{
    let actor = vm.spawn_actor(name.clone());
    let worker_actor = Arc::clone(&actor);
    let worker_vm = Arc::clone(&vm);

    let builder = std::thread::Builder::new();
    let builder = match &name {
        Some(n) => builder.name(n.to_string()),
        None => builder,
    };

    let join = builder
        .spawn(move || run_body(worker_actor, worker_vm, body))
        .unwrap_or_else(|e| crate::error::fatal(&format!("failed to spawn actor thread: {e}")));

    ActorHandle {
        actor,
        join: Some(join),
    }
}

fn run_body<F>(actor: Arc<Actor>, vm: Arc<Vm>, body: F)
where
    F: FnOnce(Arc<Actor>, Arc<Vm>) -> Result<RValue, RactorError> + Send + 'static,
{
    actor.lock().transition_to(ActorStatus::Running);
    vm.mark_running();
    record_actor_event(&vm, actor.id(), ActorEventKind::Spawned);
    record_actor_event(&vm, actor.id(), ActorEventKind::Running);

    let seq = MessageSeq::counter().next();
    let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
        body(Arc::clone(&actor), Arc::clone(&vm))
    }));

    vm.mark_paused();

    let outgoing = match result {
        Ok(Ok(value)) => crate::classify::copy_setup(value, actor.id(), seq)
            .unwrap_or_else(|_| exception_basket(actor.id(), seq, "failed to marshal result")),
        Ok(Err(err)) => exception_basket(actor.id(), seq, &err.to_string()),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "actor panicked".to_string());
            record_actor_event(
                &vm,
                actor.id(),
                ActorEventKind::Panicked {
                    cause: message.clone(),
                },
            );
            exception_basket(actor.id(), seq, &message)
        }
    };

    let mut guard = actor.lock();
    guard.wait_mut().set_yielded_basket(outgoing);
    guard.incoming_mut().close();
    guard.transition_to(ActorStatus::Terminated);
    drop(guard);
    actor.condvar().notify_all();
    record_actor_event(&vm, actor.id(), ActorEventKind::Terminated);
}

fn record_actor_event(vm: &Vm, actor_id: crate::util::ActorId, kind: ActorEventKind) {
    let _ = vm.actor_monitor().record(ActorEvent {
        timestamp: Utc::now(),
        actor_id,
        event_kind: kind,
        metadata: std::collections::HashMap::new(),
    });
}

fn exception_basket(sender: crate::util::ActorId, seq: MessageSeq, cause: &str) -> Basket {
    let bytes = serde_json::to_vec(cause).unwrap_or_default();
    Basket::new(BasketKind::Exception(bytes), sender, seq)
}
