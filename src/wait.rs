//! C4 — the wait/wakeup state machine.
//!
//! An Actor sleeps by setting `wait` to a non-empty mask and descending
//! into a cond-wait; a peer wakes it by writing `wakeup` and signaling the
//! Actor's condvar. This module defines the data the condvar guards; the
//! dispatch table of spec.md §4.3 is implemented by [`crate::rendezvous`]
//! and [`crate::actor`], both of which hold a reference to a `WaitState`.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::basket::Basket;

bitflags::bitflags! {
    /// Which rendezvous actions an Actor is currently blocked on.
    ///
    /// Mirrors `ractor.c`'s `ractor_wait_status` bitmask exactly: an Actor
    /// can be simultaneously waiting to receive, to take from a peer, and
    /// to yield (a `select` with several peers plus a `yield` argument).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WaitMask: u8 {
        /// Blocked in `receive` (or a `select` arm) on its own incoming port.
        const RECVING  = 0b001;
        /// Blocked taking from one or more peers.
        const TAKING   = 0b010;
        /// Blocked yielding a value to whichever peer takes first.
        const YIELDING = 0b100;
    }
}

/// Why a sleeping Actor was woken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    /// Still asleep.
    None,
    /// A `send` enqueued a basket into the incoming port.
    BySend,
    /// A yielder placed a basket into `taken_basket` and is handing off.
    ByYield,
    /// A taker consumed `yielded_basket`; the yield completed.
    ByTake,
    /// The port this Actor was waiting on was closed.
    ByClose,
    /// Cooperative cancellation.
    ByInterrupt,
    /// A registered `select` peer raced into a state that warrants
    /// re-entering the try phase.
    ByRetry,
}

/// The signal state a sleeping Actor's condvar guards.
///
/// Invariant: an Actor is "sleeping" iff `wait != WaitMask::empty() &&
/// wakeup == Wakeup::None`.
#[derive(Debug)]
pub struct WaitState {
    wait: WaitMask,
    wakeup: Wakeup,
    /// Filled by a yielder handing a basket to this (taking) Actor.
    taken_basket: Option<Basket>,
    /// Filled by this Actor when it is the one yielding.
    yielded_basket: Option<Basket>,
    /// Set once by `close_outgoing`; a peer blocked in `take` on this Actor
    /// sees it the same way `receive` sees a closed incoming port.
    outgoing_closed: bool,
}

impl Default for WaitState {
    fn default() -> Self {
        WaitState {
            wait: WaitMask::empty(),
            wakeup: Wakeup::None,
            taken_basket: None,
            yielded_basket: None,
            outgoing_closed: false,
        }
    }
}

impl WaitState {
    /// True if this Actor is asleep for (at least) the given mask and has
    /// not yet been assigned a wakeup reason.
    pub fn sleeping_by(&self, mask: WaitMask) -> bool {
        self.wait.intersects(mask) && self.wakeup == Wakeup::None
    }

    /// Start sleeping for the given mask. Must be called with the owning
    /// Actor's lock held; the caller is responsible for the actual
    /// cond-wait.
    pub fn begin_sleep(&mut self, mask: WaitMask) {
        self.wait = mask;
        self.wakeup = Wakeup::None;
    }

    /// Try to wake a sleeper for `mask`, writing `reason`. Returns `true`
    /// if the sleeper was actually woken (i.e. it really was sleeping by
    /// `mask` with no wakeup already pending); returns `false` silently
    /// otherwise so the caller can try another peer, per spec.md §4.3.
    pub fn try_wake(&mut self, mask: WaitMask, reason: Wakeup) -> bool {
        if self.sleeping_by(mask) {
            self.wakeup = reason;
            true
        } else {
            false
        }
    }

    /// Consume the current wakeup reason, resetting to `None` and clearing
    /// the wait mask. Called by the sleeper after it re-acquires its lock.
    pub fn take_wakeup(&mut self) -> Wakeup {
        self.wait = WaitMask::empty();
        std::mem::replace(&mut self.wakeup, Wakeup::None)
    }

    /// Place a basket for a taker to consume (the yielder's side).
    pub fn set_yielded_basket(&mut self, basket: Basket) {
        self.yielded_basket = Some(basket);
    }

    /// Take the yielded basket (the taker's side, once it has woken the
    /// yielder with `ByTake`).
    pub fn take_yielded_basket(&mut self) -> Option<Basket> {
        self.yielded_basket.take()
    }

    /// Peek whether a yielded basket is currently staged, without
    /// consuming it (used by `select`'s try phase).
    pub fn has_yielded_basket(&self) -> bool {
        self.yielded_basket.is_some()
    }

    /// Place a basket a yielder is handing to this (taking) Actor.
    pub fn set_taken_basket(&mut self, basket: Basket) {
        self.taken_basket = Some(basket);
    }

    /// Take the basket a yielder handed to this Actor.
    pub fn take_taken_basket(&mut self) -> Option<Basket> {
        self.taken_basket.take()
    }

    /// Current wait mask (diagnostics only).
    pub fn wait_mask(&self) -> WaitMask {
        self.wait
    }

    /// Mark this Actor's outgoing port closed. Idempotent.
    pub fn close_outgoing(&mut self) {
        self.outgoing_closed = true;
    }

    /// True once [`WaitState::close_outgoing`] has been called.
    pub fn is_outgoing_closed(&self) -> bool {
        self.outgoing_closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::BasketKind;
    use crate::util::{ActorId, MessageSeq};
    use crate::value::RValue;

    fn basket() -> Basket {
        Basket::new(
            BasketKind::Shareable(std::sync::Arc::new(RValue::Int(1))),
            ActorId::from_raw(1),
            MessageSeq::counter().next(),
        )
    }

    #[test]
    fn not_sleeping_when_wait_mask_is_empty() {
        let w = WaitState::default();
        assert!(!w.sleeping_by(WaitMask::RECVING));
    }

    #[test]
    fn sleeping_by_matches_intersecting_mask() {
        let mut w = WaitState::default();
        w.begin_sleep(WaitMask::RECVING | WaitMask::TAKING);
        assert!(w.sleeping_by(WaitMask::RECVING));
        assert!(w.sleeping_by(WaitMask::TAKING));
        assert!(!w.sleeping_by(WaitMask::YIELDING));
    }

    #[test]
    fn try_wake_fails_silently_when_not_sleeping_by_mask() {
        let mut w = WaitState::default();
        w.begin_sleep(WaitMask::TAKING);
        assert!(!w.try_wake(WaitMask::RECVING, Wakeup::BySend));
    }

    #[test]
    fn try_wake_succeeds_and_sets_reason() {
        let mut w = WaitState::default();
        w.begin_sleep(WaitMask::RECVING);
        assert!(w.try_wake(WaitMask::RECVING, Wakeup::BySend));
        assert_eq!(w.take_wakeup(), Wakeup::BySend);
    }

    #[test]
    fn take_wakeup_resets_to_none_and_clears_mask() {
        let mut w = WaitState::default();
        w.begin_sleep(WaitMask::RECVING);
        w.try_wake(WaitMask::RECVING, Wakeup::BySend);
        w.take_wakeup();
        assert!(w.wait_mask().is_empty());
        assert!(!w.sleeping_by(WaitMask::RECVING));
    }

    #[test]
    fn yielded_basket_roundtrips() {
        let mut w = WaitState::default();
        assert!(!w.has_yielded_basket());
        w.set_yielded_basket(basket());
        assert!(w.has_yielded_basket());
        assert!(w.take_yielded_basket().is_some());
        assert!(!w.has_yielded_basket());
    }

    #[test]
    fn taken_basket_roundtrips() {
        let mut w = WaitState::default();
        w.set_taken_basket(basket());
        assert!(w.take_taken_basket().is_some());
        assert!(w.take_taken_basket().is_none());
    }
}
