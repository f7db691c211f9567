//! C7 — the VM: the actor registry, the recursive global lock, and the
//! stop-the-world barrier built on top of it.
//!
//! Grounded on `vm_sync.c`'s `rb_vm_lock`/`rb_vm_barrier` pair: most
//! operations never need the global lock at all (an Actor's own lock is
//! enough), but a handful of cross-cutting operations — T-Var bulk-lock
//! commit, `terminate_all` — need every other Actor paused first.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;

// Layer 2: Third-party crate imports
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};

// Layer 3: Internal module imports
use crate::actor::{Actor, ActorStatus};
use crate::monitoring::{Monitor, MonitorHandle, SystemEvent, SystemEventKind};
use crate::util::{ActorId, ActorIdAllocator};

#[derive(Debug, Default)]
struct GlobalLockState {
    owner: Option<ThreadId>,
    depth: u32,
}

/// A recursive, process-wide lock. Re-entrant on the same OS thread;
/// blocking for any other thread.
#[derive(Debug, Default)]
struct GlobalLock {
    state: Mutex<GlobalLockState>,
    cond: Condvar,
}

impl GlobalLock {
    fn acquire(&self) {
        let me = std::thread::current().id();
        let mut state = self.state.lock();
        loop {
            match state.owner {
                Some(owner) if owner == me => {
                    state.depth += 1;
                    return;
                }
                None => {
                    state.owner = Some(me);
                    state.depth = 1;
                    return;
                }
                Some(_) => self.cond.wait(&mut state),
            }
        }
    }

    fn release(&self) {
        let me = std::thread::current().id();
        let mut state = self.state.lock();
        debug_assert_eq!(state.owner, Some(me), "released global lock not held by caller");
        state.depth -= 1;
        if state.depth == 0 {
            state.owner = None;
            self.cond.notify_one();
        }
    }
}

/// RAII guard for [`Vm::global_lock`].
pub struct GlobalLockGuard<'a> {
    vm: &'a Vm,
}

impl Drop for GlobalLockGuard<'_> {
    fn drop(&mut self) {
        self.vm.lock.release();
    }
}

/// Owns the actor registry and the global lock/barrier. One `Vm` per
/// process is the expected usage (see [`crate::system::Runtime`]), but
/// nothing here relies on that — it is never file-scope global state.
#[derive(Debug)]
pub struct Vm {
    actors: DashMap<ActorId, Arc<Actor>>,
    id_alloc: ActorIdAllocator,
    lock: GlobalLock,
    /// Count of Actors currently `Running`, i.e. not safely paused. A
    /// barrier waits for this to reach zero before proceeding.
    running: AtomicUsize,
    barrier_cond: Condvar,
    barrier_state: Mutex<()>,
    actor_monitor: MonitorHandle<crate::monitoring::ActorEvent>,
    rendezvous_monitor: MonitorHandle<crate::monitoring::RendezvousEvent>,
    system_monitor: MonitorHandle<SystemEvent>,
}

impl Vm {
    /// A fresh VM with just the main Actor registered and monitoring
    /// disabled. Use [`Vm::with_config`] to enable event recording.
    pub fn new() -> Self {
        Self::with_monitoring(false)
    }

    /// A fresh VM configured from a [`crate::system::SystemConfig`].
    pub fn with_config(config: &crate::system::SystemConfig) -> Self {
        Self::with_monitoring(config.enable_monitoring)
    }

    fn with_monitoring(enable_monitoring: bool) -> Self {
        let id_alloc = ActorIdAllocator::default();
        let main_id = id_alloc.next();
        let actors = DashMap::new();
        actors.insert(main_id, Actor::new(main_id, Some(Arc::from("main"))));
        Vm {
            actors,
            id_alloc,
            lock: GlobalLock::default(),
            running: AtomicUsize::new(0),
            barrier_cond: Condvar::new(),
            barrier_state: Mutex::new(()),
            actor_monitor: MonitorHandle::new(enable_monitoring),
            rendezvous_monitor: MonitorHandle::new(enable_monitoring),
            system_monitor: MonitorHandle::new(enable_monitoring),
        }
    }

    /// This VM's Actor lifecycle event monitor.
    pub fn actor_monitor(&self) -> &MonitorHandle<crate::monitoring::ActorEvent> {
        &self.actor_monitor
    }

    /// This VM's rendezvous event monitor.
    pub fn rendezvous_monitor(&self) -> &MonitorHandle<crate::monitoring::RendezvousEvent> {
        &self.rendezvous_monitor
    }

    fn record_system_event(&self, kind: SystemEventKind) {
        let _ = self.system_monitor.record(SystemEvent {
            timestamp: Utc::now(),
            event_kind: kind,
            metadata: std::collections::HashMap::new(),
        });
    }

    /// The always-present main Actor.
    pub fn main(&self) -> Arc<Actor> {
        match self.lookup(ActorId::MAIN) {
            Some(actor) => actor,
            None => crate::error::fatal("main actor missing from registry"),
        }
    }

    /// Register a brand-new Actor and return it.
    pub fn spawn_actor(&self, name: Option<Arc<str>>) -> Arc<Actor> {
        let id = self.id_alloc.next();
        let actor = Actor::new(id, name);
        self.actors.insert(id, Arc::clone(&actor));
        self.record_system_event(SystemEventKind::ActorRegistered { actor_id: id });
        actor
    }

    /// Look up a live Actor by id.
    pub fn lookup(&self, id: ActorId) -> Option<Arc<Actor>> {
        self.actors.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove a terminated Actor from the registry.
    pub fn retire(&self, id: ActorId) {
        self.actors.remove(&id);
        self.record_system_event(SystemEventKind::ActorDeregistered { actor_id: id });
    }

    /// Number of Actors currently registered (including `Terminated` ones
    /// not yet retired).
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Acquire the recursive global lock for the duration of the guard.
    pub fn global_lock(&self) -> GlobalLockGuard<'_> {
        self.lock.acquire();
        GlobalLockGuard { vm: self }
    }

    /// Mark the calling Actor as entering `Running` (i.e. not safely
    /// paused) — called by the worker loop before invoking the Actor
    /// body, and after it resumes from a blocking rendezvous call.
    pub fn mark_running(&self) {
        self.running.fetch_add(1, Ordering::SeqCst);
    }

    /// Mark the calling Actor as leaving `Running` — called whenever it
    /// parks on a rendezvous wait. Wakes a barrier waiter if this was the
    /// last Running Actor.
    pub fn mark_paused(&self) {
        if self.running.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _guard = self.barrier_state.lock();
            self.barrier_cond.notify_all();
        }
    }

    /// Stop-the-world: run `f` once every Actor has been observed paused.
    /// Holds the global lock for the duration, so nested barriers from the
    /// same thread are fine but a second thread's barrier blocks behind
    /// this one.
    pub fn barrier<R>(&self, f: impl FnOnce() -> R) -> R {
        let _global = self.global_lock();
        self.record_system_event(SystemEventKind::BarrierEntered);
        let mut guard = self.barrier_state.lock();
        while self.running.load(Ordering::SeqCst) > 0 {
            self.barrier_cond.wait(&mut guard);
        }
        drop(guard);
        let result = f();
        self.record_system_event(SystemEventKind::BarrierExited);
        result
    }

    /// Request every registered Actor to terminate and wait for the
    /// registry to empty out except for `MAIN`. Intended for process
    /// shutdown; individual Actor bodies still run to completion — this
    /// just stops accepting new work by closing every incoming port.
    pub fn terminate_all(&self) {
        self.record_system_event(SystemEventKind::ShutdownInitiated);
        let actors: Vec<Arc<Actor>> = self
            .actors
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        self.barrier(|| {
            for actor in &actors {
                let mut guard = actor.lock();
                guard.incoming_mut().close();
                guard.wait_mut().try_wake(
                    crate::wait::WaitMask::RECVING
                        | crate::wait::WaitMask::TAKING
                        | crate::wait::WaitMask::YIELDING,
                    crate::wait::Wakeup::ByClose,
                );
                if guard.status() != ActorStatus::Terminated {
                    guard.transition_to(ActorStatus::Terminated);
                }
            }
        });
        for actor in &actors {
            actor.condvar().notify_all();
        }
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_vm_registers_only_main() {
        let vm = Vm::new();
        assert_eq!(vm.actor_count(), 1);
        assert_eq!(vm.main().id(), ActorId::MAIN);
    }

    #[test]
    fn spawn_actor_registers_and_is_lookupable() {
        let vm = Vm::new();
        let actor = vm.spawn_actor(Some(Arc::from("worker")));
        assert_eq!(vm.actor_count(), 2);
        assert_eq!(vm.lookup(actor.id()).unwrap().id(), actor.id());
    }

    #[test]
    fn retire_removes_from_registry() {
        let vm = Vm::new();
        let actor = vm.spawn_actor(None);
        vm.retire(actor.id());
        assert!(vm.lookup(actor.id()).is_none());
    }

    #[test]
    fn global_lock_is_reentrant_on_same_thread() {
        let vm = Vm::new();
        let _outer = vm.global_lock();
        let _inner = vm.global_lock();
    }

    #[test]
    fn barrier_runs_immediately_when_nothing_is_running() {
        let vm = Vm::new();
        let ran = vm.barrier(|| true);
        assert!(ran);
    }

    #[test]
    fn terminate_all_closes_every_incoming_port() {
        let vm = Vm::new();
        let actor = vm.spawn_actor(None);
        vm.terminate_all();
        assert!(vm.main().lock().incoming().is_closed());
        assert!(actor.lock().incoming().is_closed());
        assert_eq!(actor.lock().status(), ActorStatus::Terminated);
    }
}
