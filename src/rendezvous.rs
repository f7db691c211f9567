//! C5 — the rendezvous engine: `send`, `receive`, `yield`, `take`, and
//! `select` over any mix of the three.
//!
//! Grounded on `ractor.c`'s `ractor_send`/`ractor_try_take`/
//! `ractor_yield`/`ractor_select`. One simplification from the original:
//! rather than registering a selector with every peer it might wake on
//! (the C implementation threads a wait-list through each Ractor's
//! struct), a blocked [`Ctx::select`] re-polls its candidate arms on a
//! short timeout. Every individual operation is still exactly as
//! documented — no basket is ever duplicated or dropped — the
//! simplification only affects how quickly a sleeper notices it can
//! proceed, not whether it eventually does.

// Layer 1: Standard library imports
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use chrono::Utc;
use rand::seq::SliceRandom;

// Layer 3: Internal module imports
use crate::actor::{Actor, ActorStatus};
use crate::classify::{self, accept};
use crate::error::RactorError;
use crate::monitoring::{Monitor, RendezvousEvent, RendezvousEventKind};
use crate::util::{ActorId, MessageSeq};
use crate::value::{Handle, RValue};
use crate::vm::Vm;
use crate::wait::{WaitMask, Wakeup};

fn record_rendezvous_event(vm: &Vm, actor_id: ActorId, kind: RendezvousEventKind) {
    let _ = vm.rendezvous_monitor().record(RendezvousEvent {
        timestamp: Utc::now(),
        actor_id,
        event_kind: kind,
        metadata: std::collections::HashMap::new(),
    });
}

/// How long a blocked [`Ctx::select`] sleeps between re-polls of its
/// candidate arms. Short enough that tests relying on `select` complete
/// promptly; long enough not to spin the CPU.
const SELECT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A value to yield, either aliased/marshaled ([`YieldPayload::Copy`]) or
/// moved out of a [`Handle`] ([`YieldPayload::Move`]).
#[derive(Debug)]
pub enum YieldPayload {
    /// Send without `move`.
    Copy(RValue),
    /// Send with `move`: the handle is invalidated once staged.
    Move(Handle),
}

/// One arm of a [`Ctx::select`] call.
pub enum SelectArm {
    /// Complete when this Actor's own incoming port has a basket ready.
    Receive,
    /// Complete when `peer` has a basket staged to yield.
    Take(Arc<Actor>),
    /// Complete when some other Actor takes `payload` from us.
    Yield(YieldPayload),
}

/// What a [`Ctx::select`] call completed with.
#[derive(Debug)]
pub enum SelectOutcome {
    /// The `Receive` arm won.
    Received(RValue),
    /// A `Take(peer)` arm won.
    Took { from: ActorId, value: RValue },
    /// The `Yield` arm won — some other Actor took our value.
    Yielded,
}

/// The rendezvous operations available to a running Actor body, bound to
/// the [`Actor`] it runs as and the [`Vm`] that owns it.
#[derive(Clone)]
pub struct Ctx {
    vm: Arc<Vm>,
    actor: Arc<Actor>,
}

impl Ctx {
    /// Bind a context to `actor` running under `vm`.
    pub fn new(vm: Arc<Vm>, actor: Arc<Actor>) -> Self {
        Ctx { vm, actor }
    }

    /// This Actor's own identity.
    pub fn id(&self) -> ActorId {
        self.actor.id()
    }

    /// The Actor this context drives (for [`Ctx::take`]/[`Ctx::send`]
    /// targets to reference).
    pub fn actor(&self) -> &Arc<Actor> {
        &self.actor
    }

    /// Enqueue `value` onto `to`'s incoming port without blocking.
    pub fn send(&self, to: &Arc<Actor>, value: RValue) -> Result<(), RactorError> {
        let basket = classify::copy_setup(value, self.id(), MessageSeq::counter().next())?;
        self.deliver(to, basket)
    }

    /// Enqueue the contents of `handle` onto `to`'s incoming port,
    /// invalidating `handle`.
    pub fn send_move(&self, to: &Arc<Actor>, handle: &Handle) -> Result<(), RactorError> {
        let basket = classify::move_setup(handle, self.id(), MessageSeq::counter().next())?;
        self.deliver(to, basket)
    }

    fn deliver(&self, to: &Arc<Actor>, basket: crate::basket::Basket) -> Result<(), RactorError> {
        let mut guard = to.lock();
        if !guard.incoming_mut().push(basket) {
            record_rendezvous_event(&self.vm, to.id(), RendezvousEventKind::SendRejected);
            return Err(RactorError::closed(to.id()));
        }
        let queue_len = guard.incoming().len();
        guard.wait_mut().try_wake(WaitMask::RECVING, Wakeup::BySend);
        drop(guard);
        to.condvar().notify_all();
        record_rendezvous_event(&self.vm, to.id(), RendezvousEventKind::Enqueued { queue_len });
        Ok(())
    }

    /// Block until a basket is available on this Actor's own incoming
    /// port, or it has been closed.
    pub fn receive(&self) -> Result<RValue, RactorError> {
        let mut guard = self.actor.lock();
        loop {
            if let Some(basket) = guard.incoming_mut().pop() {
                let queue_len = guard.incoming().len();
                drop(guard);
                record_rendezvous_event(
                    &self.vm,
                    self.id(),
                    RendezvousEventKind::Dequeued { queue_len },
                );
                return accept(basket, self.id());
            }
            if guard.incoming().is_closed() {
                return Err(RactorError::closed(self.id()));
            }
            guard.wait_mut().begin_sleep(WaitMask::RECVING);
            record_rendezvous_event(
                &self.vm,
                self.id(),
                RendezvousEventKind::Blocked {
                    wait_mask: format!("{:?}", WaitMask::RECVING),
                },
            );
            self.vm.mark_paused();
            self.actor.condvar().wait(&mut guard);
            self.vm.mark_running();
            if guard.wait_mut().take_wakeup() == Wakeup::ByInterrupt {
                return Err(RactorError::interrupted(self.id()));
            }
            record_rendezvous_event(
                &self.vm,
                self.id(),
                RendezvousEventKind::Woken {
                    reason: "recv".to_string(),
                },
            );
        }
    }

    /// Block until some other Actor takes `value` from our outgoing
    /// port.
    pub fn yield_value(&self, value: RValue) -> Result<(), RactorError> {
        self.yield_payload(YieldPayload::Copy(value))
    }

    /// Block until some other Actor takes the contents of `handle`,
    /// invalidating it once staged.
    pub fn yield_move(&self, handle: &Handle) -> Result<(), RactorError> {
        self.yield_payload(YieldPayload::Move(handle.clone()))
    }

    fn yield_payload(&self, payload: YieldPayload) -> Result<(), RactorError> {
        let seq = MessageSeq::counter().next();
        let basket = match payload {
            YieldPayload::Copy(v) => classify::copy_setup(v, self.id(), seq)?,
            YieldPayload::Move(h) => classify::move_setup(&h, self.id(), seq)?,
        };
        let mut guard = self.actor.lock();
        guard.wait_mut().set_yielded_basket(basket);
        guard.wait_mut().begin_sleep(WaitMask::YIELDING);
        drop(guard);
        self.actor.condvar().notify_all();
        record_rendezvous_event(
            &self.vm,
            self.id(),
            RendezvousEventKind::Blocked {
                wait_mask: format!("{:?}", WaitMask::YIELDING),
            },
        );
        let mut guard = self.actor.lock();
        loop {
            self.vm.mark_paused();
            self.actor.condvar().wait(&mut guard);
            self.vm.mark_running();
            if !guard.wait().has_yielded_basket() {
                drop(guard);
                record_rendezvous_event(
                    &self.vm,
                    self.id(),
                    RendezvousEventKind::Woken {
                        reason: "taken".to_string(),
                    },
                );
                return Ok(());
            }
            match guard.wait_mut().take_wakeup() {
                Wakeup::ByClose => {
                    guard.wait_mut().take_yielded_basket();
                    return Err(RactorError::closed(self.id()));
                }
                Wakeup::ByInterrupt => {
                    guard.wait_mut().take_yielded_basket();
                    return Err(RactorError::interrupted(self.id()));
                }
                _ => guard.wait_mut().begin_sleep(WaitMask::YIELDING),
            }
        }
    }

    /// Block until `peer` has a basket staged via `yield` and take it.
    pub fn take(&self, peer: &Arc<Actor>) -> Result<RValue, RactorError> {
        let mut guard = peer.lock();
        loop {
            if let Some(basket) = guard.wait_mut().take_yielded_basket() {
                guard.wait_mut().try_wake(WaitMask::YIELDING, Wakeup::ByTake);
                drop(guard);
                peer.condvar().notify_all();
                record_rendezvous_event(
                    &self.vm,
                    peer.id(),
                    RendezvousEventKind::Woken {
                        reason: "take".to_string(),
                    },
                );
                return accept(basket, self.id());
            }
            if peer_is_unreachable(&guard) {
                return Err(RactorError::closed(peer.id()));
            }
            self.vm.mark_paused();
            peer.condvar().wait(&mut guard);
            self.vm.mark_running();
        }
    }

    /// Close this Actor's own incoming port: further `send`s to it fail
    /// with [`RactorError::Closed`], but already-queued baskets can still
    /// be drained by `receive`.
    pub fn close_incoming(&self) {
        let mut guard = self.actor.lock();
        guard.incoming_mut().close();
        guard.wait_mut().try_wake(WaitMask::RECVING, Wakeup::ByClose);
        drop(guard);
        self.actor.condvar().notify_all();
        record_rendezvous_event(&self.vm, self.id(), RendezvousEventKind::PortClosed);
    }

    /// Close this Actor's own outgoing port: idempotent, wakes any sleeper
    /// blocked yielding with [`RactorError::Closed`], and wakes every Actor
    /// registered in `taking_list` so its `take`/`select` call can observe
    /// the closed peer instead of sleeping forever.
    pub fn close_outgoing(&self) {
        let mut guard = self.actor.lock();
        guard.wait_mut().close_outgoing();
        guard.wait_mut().try_wake(WaitMask::YIELDING, Wakeup::ByClose);
        let takers: Vec<Arc<Actor>> = std::mem::take(guard.taking_list_mut());
        drop(guard);
        self.actor.condvar().notify_all();
        for taker in &takers {
            let mut tguard = taker.lock();
            tguard.wait_mut().try_wake(WaitMask::TAKING, Wakeup::ByClose);
            drop(tguard);
            taker.condvar().notify_all();
        }
        record_rendezvous_event(&self.vm, self.id(), RendezvousEventKind::PortClosed);
    }

    /// Cooperatively cancel `target`'s current blocking rendezvous call:
    /// wakes it with [`Wakeup::ByInterrupt`] regardless of which mask it is
    /// sleeping on, so it unwinds with [`RactorError::Interrupted`] instead
    /// of whatever it was waiting to complete.
    pub fn interrupt(&self, target: &Arc<Actor>) {
        let mut guard = target.lock();
        guard.wait_mut().try_wake(
            WaitMask::RECVING | WaitMask::TAKING | WaitMask::YIELDING,
            Wakeup::ByInterrupt,
        );
        drop(guard);
        target.condvar().notify_all();
    }

    fn register_taking(&self, peers: &[Arc<Actor>]) -> Result<Vec<Arc<Actor>>, RactorError> {
        let mut registered = Vec::with_capacity(peers.len());
        for peer in peers {
            let mut guard = peer.lock();
            if guard.taking_list().iter().any(|a| a.id() == self.id()) {
                drop(guard);
                self.unregister_taking(&registered);
                return Err(RactorError::AlreadyWaiting { actor: self.id() });
            }
            guard.taking_list_mut().push(Arc::clone(&self.actor));
            registered.push(Arc::clone(peer));
        }
        Ok(registered)
    }

    fn unregister_taking(&self, peers: &[Arc<Actor>]) {
        for peer in peers {
            let mut guard = peer.lock();
            guard.taking_list_mut().retain(|a| a.id() != self.id());
        }
    }

    /// Wait on several rendezvous arms at once, returning as soon as the
    /// first one completes. Arms are tried in order unless `fair` is set,
    /// in which case the try-order is shuffled each poll.
    pub fn select(&self, mut arms: Vec<SelectArm>, fair: bool) -> Result<SelectOutcome, RactorError> {
        if fair {
            arms.shuffle(&mut rand::thread_rng());
        }

        let take_peers: Vec<Arc<Actor>> = arms
            .iter()
            .filter_map(|arm| match arm {
                SelectArm::Take(peer) => Some(Arc::clone(peer)),
                _ => None,
            })
            .collect();
        let registered = self.register_taking(&take_peers)?;
        let result = self.run_select_loop(arms);
        self.unregister_taking(&registered);
        result
    }

    fn run_select_loop(&self, arms: Vec<SelectArm>) -> Result<SelectOutcome, RactorError> {
        let mut staged = false;
        loop {
            if staged {
                let mut guard = self.actor.lock();
                if !guard.wait().has_yielded_basket() {
                    return Ok(SelectOutcome::Yielded);
                }
                guard.wait_mut().take_yielded_basket();
                guard.wait_mut().begin_sleep(WaitMask::empty());
                staged = false;
            }

            for arm in &arms {
                match arm {
                    SelectArm::Receive => {
                        let mut guard = self.actor.lock();
                        if let Some(basket) = guard.incoming_mut().pop() {
                            return Ok(SelectOutcome::Received(accept(basket, self.id())?));
                        }
                        if guard.incoming().is_closed() {
                            return Err(RactorError::closed(self.id()));
                        }
                    }
                    SelectArm::Take(peer) => {
                        let mut guard = peer.lock();
                        if let Some(basket) = guard.wait_mut().take_yielded_basket() {
                            guard.wait_mut().try_wake(WaitMask::YIELDING, Wakeup::ByTake);
                            drop(guard);
                            peer.condvar().notify_all();
                            let from = basket.sender();
                            return Ok(SelectOutcome::Took {
                                from,
                                value: accept(basket, self.id())?,
                            });
                        }
                        if peer_is_unreachable(&guard) {
                            return Err(RactorError::closed(peer.id()));
                        }
                    }
                    SelectArm::Yield(_) => {}
                }
            }

            if let Some(SelectArm::Yield(_)) = arms.iter().find(|a| matches!(a, SelectArm::Yield(_))) {
                if !staged {
                    let payload = arms.iter().find_map(|a| match a {
                        SelectArm::Yield(YieldPayload::Copy(v)) => Some(YieldPayload::Copy(v.clone())),
                        SelectArm::Yield(YieldPayload::Move(h)) => Some(YieldPayload::Move(h.clone())),
                        _ => None,
                    });
                    if let Some(payload) = payload {
                        let seq = MessageSeq::counter().next();
                        let basket = match payload {
                            YieldPayload::Copy(v) => classify::copy_setup(v, self.id(), seq)?,
                            YieldPayload::Move(h) => classify::move_setup(&h, self.id(), seq)?,
                        };
                        let mut guard = self.actor.lock();
                        guard.wait_mut().set_yielded_basket(basket);
                        staged = true;
                    }
                }
            }

            let mask = select_wait_mask(&arms);
            let mut guard = self.actor.lock();
            guard.wait_mut().begin_sleep(mask);
            drop(guard);
            record_rendezvous_event(
                &self.vm,
                self.id(),
                RendezvousEventKind::Blocked {
                    wait_mask: format!("{mask:?}"),
                },
            );
            let mut guard = self.actor.lock();
            self.vm.mark_paused();
            self.actor.condvar().wait_for(&mut guard, SELECT_POLL_INTERVAL);
            self.vm.mark_running();
            if guard.wait_mut().take_wakeup() == Wakeup::ByInterrupt {
                return Err(RactorError::interrupted(self.id()));
            }
        }
    }
}

fn peer_is_unreachable(guard: &crate::actor::ActorInner) -> bool {
    (guard.status() == ActorStatus::Terminated || guard.wait().is_outgoing_closed())
        && !guard.wait().has_yielded_basket()
}

fn select_wait_mask(arms: &[SelectArm]) -> WaitMask {
    let mut mask = WaitMask::empty();
    for arm in arms {
        mask |= match arm {
            SelectArm::Receive => WaitMask::RECVING,
            SelectArm::Take(_) => WaitMask::TAKING,
            SelectArm::Yield(_) => WaitMask::YIELDING,
        };
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::Vm;

    fn ctx_for(vm: &Arc<Vm>, actor: &Arc<Actor>) -> Ctx {
        Ctx::new(Arc::clone(vm), Arc::clone(actor))
    }

    #[test]
    fn send_then_receive_roundtrips() {
        let vm = Arc::new(Vm::new());
        let a = vm.spawn_actor(None);
        let b = vm.spawn_actor(None);
        let ctx_a = ctx_for(&vm, &a);
        ctx_a.send(&b, RValue::Int(7)).unwrap();
        let ctx_b = ctx_for(&vm, &b);
        assert_eq!(ctx_b.receive().unwrap(), RValue::Int(7));
    }

    #[test]
    fn receive_on_closed_empty_port_fails() {
        let vm = Arc::new(Vm::new());
        let a = vm.spawn_actor(None);
        let ctx = ctx_for(&vm, &a);
        ctx.close_incoming();
        assert!(matches!(ctx.receive(), Err(RactorError::Closed { .. })));
    }

    #[test]
    fn send_to_closed_port_fails() {
        let vm = Arc::new(Vm::new());
        let a = vm.spawn_actor(None);
        let b = vm.spawn_actor(None);
        ctx_for(&vm, &b).close_incoming();
        let err = ctx_for(&vm, &a).send(&b, RValue::Nil).unwrap_err();
        assert!(matches!(err, RactorError::Closed { .. }));
    }

    #[test]
    fn yield_and_take_rendezvous_across_threads() {
        let vm = Arc::new(Vm::new());
        let yielder = vm.spawn_actor(None);
        let taker = vm.spawn_actor(None);

        let yielder_ctx = ctx_for(&vm, &yielder);
        let yielder_actor = Arc::clone(&yielder);
        let handle = std::thread::spawn(move || yielder_ctx.yield_value(RValue::Int(99)));

        std::thread::sleep(Duration::from_millis(5));
        let taken = ctx_for(&vm, &taker).take(&yielder_actor).unwrap();
        assert_eq!(taken, RValue::Int(99));
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn select_prefers_whichever_arm_becomes_ready() {
        let vm = Arc::new(Vm::new());
        let a = vm.spawn_actor(None);
        let ctx_a = ctx_for(&vm, &a);

        ctx_a.send(&a, RValue::Int(1)).unwrap();

        let outcome = ctx_a
            .select(vec![SelectArm::Receive], false)
            .unwrap();
        assert!(matches!(outcome, SelectOutcome::Received(RValue::Int(1))));
    }

    #[test]
    fn select_take_arm_wins_when_peer_yields() {
        let vm = Arc::new(Vm::new());
        let yielder = vm.spawn_actor(None);
        let selector = vm.spawn_actor(None);

        let yielder_ctx = ctx_for(&vm, &yielder);
        let handle = std::thread::spawn(move || yielder_ctx.yield_value(RValue::Int(5)));

        std::thread::sleep(Duration::from_millis(5));
        let outcome = ctx_for(&vm, &selector)
            .select(vec![SelectArm::Take(Arc::clone(&yielder))], false)
            .unwrap();
        match outcome {
            SelectOutcome::Took { value, .. } => assert_eq!(value, RValue::Int(5)),
            other => panic!("expected Took, got {other:?}"),
        }
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn select_rejects_a_duplicate_take_registration_on_the_same_peer() {
        let vm = Arc::new(Vm::new());
        let peer = vm.spawn_actor(None);
        let selector = vm.spawn_actor(None);
        let ctx = ctx_for(&vm, &selector);

        // Register directly, bypassing select, to simulate an in-flight
        // registration on `peer` from this same Actor.
        peer.lock().taking_list_mut().push(Arc::clone(&selector));

        let err = ctx
            .select(vec![SelectArm::Take(Arc::clone(&peer))], false)
            .unwrap_err();
        assert!(matches!(err, RactorError::AlreadyWaiting { .. }));
        // The failed registration must not have left a second entry behind.
        assert_eq!(peer.lock().taking_list().len(), 1);
    }

    #[test]
    fn close_outgoing_wakes_a_blocked_taker_with_closed_error() {
        let vm = Arc::new(Vm::new());
        let yielder = vm.spawn_actor(None);
        let taker = vm.spawn_actor(None);

        let yielder_ctx = ctx_for(&vm, &yielder);
        let yielder_for_taker = Arc::clone(&yielder);
        let taker_ctx = ctx_for(&vm, &taker);
        let take_handle = std::thread::spawn(move || taker_ctx.take(&yielder_for_taker));

        std::thread::sleep(Duration::from_millis(5));
        yielder_ctx.close_outgoing();

        let result = take_handle.join().unwrap();
        assert!(matches!(result, Err(RactorError::Closed { .. })));
    }

    #[test]
    fn interrupt_wakes_a_blocked_receive() {
        let vm = Arc::new(Vm::new());
        let actor = vm.spawn_actor(None);
        let ctx = ctx_for(&vm, &actor);
        let interrupter = ctx_for(&vm, &actor);

        let ctx_clone = ctx.clone();
        let handle = std::thread::spawn(move || ctx_clone.receive());

        std::thread::sleep(Duration::from_millis(5));
        interrupter.interrupt(&actor);

        let result = handle.join().unwrap();
        assert!(matches!(result, Err(RactorError::Interrupted { .. })));
    }
}
