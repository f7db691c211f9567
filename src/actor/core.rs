//! The Actor itself: an isolated worker with one incoming queue, one
//! wait/wakeup slot, and a lock that both guard.
//!
//! Every rendezvous operation in [`crate::rendezvous`] begins by locking
//! the Actor(s) it touches, in a fixed order documented there to avoid
//! deadlock across a multi-peer `select`.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::{Condvar, Mutex, MutexGuard};

// Layer 3: Internal module imports
use super::lifecycle::{ActorLifecycle, ActorStatus};
use crate::queue::Queue;
use crate::util::ActorId;
use crate::wait::WaitState;

/// State an Actor's lock guards: its queue, its wait/wakeup slot, and its
/// lifecycle tracker. Held as one [`parking_lot::Mutex`] so a sender can
/// atomically enqueue a basket and check/flip the receiver's wait state.
#[derive(Debug)]
pub struct ActorInner {
    lifecycle: ActorLifecycle,
    incoming: Queue,
    wait: WaitState,
    /// Peers currently registered via [`crate::rendezvous::Ctx::select`]'s
    /// `Take` arms, waiting for this Actor to yield. At most one entry per
    /// taking Actor — a duplicate registration is a programmer error
    /// ([`crate::error::RactorError::AlreadyWaiting`]).
    taking_list: Vec<Arc<Actor>>,
}

impl ActorInner {
    /// The Actor's current status.
    pub fn status(&self) -> ActorStatus {
        self.lifecycle.status()
    }

    /// Move the Actor to a new status.
    pub fn transition_to(&mut self, status: ActorStatus) {
        self.lifecycle.transition_to(status);
    }

    /// The lifecycle tracker, for diagnostics.
    pub fn lifecycle(&self) -> &ActorLifecycle {
        &self.lifecycle
    }

    /// The incoming queue.
    pub fn incoming(&self) -> &Queue {
        &self.incoming
    }

    /// The incoming queue, mutably.
    pub fn incoming_mut(&mut self) -> &mut Queue {
        &mut self.incoming
    }

    /// The wait/wakeup slot.
    pub fn wait(&self) -> &WaitState {
        &self.wait
    }

    /// The wait/wakeup slot, mutably.
    pub fn wait_mut(&mut self) -> &mut WaitState {
        &mut self.wait
    }

    /// Peers registered to take from this Actor.
    pub fn taking_list(&self) -> &[Arc<Actor>] {
        &self.taking_list
    }

    /// Peers registered to take from this Actor, mutably.
    pub fn taking_list_mut(&mut self) -> &mut Vec<Arc<Actor>> {
        &mut self.taking_list
    }
}

/// A single isolated Actor.
///
/// `Actor` never exposes `&mut self` methods directly — every mutation
/// goes through [`Actor::lock`], matching how the source system requires
/// the Actor lock to be held for any state change.
#[derive(Debug)]
pub struct Actor {
    id: ActorId,
    name: Option<Arc<str>>,
    inner: Mutex<ActorInner>,
    cond: Condvar,
}

impl Actor {
    /// Build a fresh, `Created` Actor and wrap it for shared ownership.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ractor_rt::actor::{Actor, ActorStatus};
    /// use ractor_rt::util::ActorId;
    ///
    /// let actor = Actor::new(ActorId::from_raw(1), None);
    /// assert_eq!(actor.id(), ActorId::from_raw(1));
    /// assert_eq!(actor.lock().status(), ActorStatus::Created);
    /// ```
    pub fn new(id: ActorId, name: Option<Arc<str>>) -> Arc<Self> {
        Arc::new(Actor {
            id,
            name,
            inner: Mutex::new(ActorInner {
                lifecycle: ActorLifecycle::new(),
                incoming: Queue::new(),
                wait: WaitState::default(),
                taking_list: Vec::new(),
            }),
            cond: Condvar::new(),
        })
    }

    /// This Actor's identity.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// This Actor's diagnostic name, if one was given at spawn time.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Lock the Actor's guarded state.
    pub fn lock(&self) -> MutexGuard<'_, ActorInner> {
        self.inner.lock()
    }

    /// The condvar sleepers on this Actor wait on and wakers notify.
    pub fn condvar(&self) -> &Condvar {
        &self.cond
    }

    /// True once this Actor has fully terminated.
    pub fn is_terminated(&self) -> bool {
        self.inner.lock().status() == ActorStatus::Terminated
    }
}
