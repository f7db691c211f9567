//! C3 — the per-Actor incoming queue.
//!
//! Every Actor owns exactly one `Queue`: a growable FIFO of [`Basket`]s
//! guarded by the Actor's own lock (see [`crate::actor::Actor`]). `send`
//! pushes, `receive` pops; ordering between two sends from the same
//! sender is preserved because both run under that lock.

// Layer 1: Standard library imports
use std::collections::VecDeque;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::basket::Basket;

/// A closable FIFO of baskets.
///
/// Unlike the source system's manually-doubled circular buffer, this is a
/// plain [`VecDeque`] — Rust's std collection already gives amortized O(1)
/// push/pop at both ends, so there is nothing idiomatic to gain by hand
/// rolling the growth strategy.
#[derive(Debug, Default)]
pub struct Queue {
    items: VecDeque<Basket>,
    closed: bool,
}

impl Queue {
    /// A fresh, open, empty queue.
    pub fn new() -> Self {
        Queue::default()
    }

    /// Push a basket to the back. Returns `false` without enqueuing if the
    /// queue has been closed — the caller (`send`) turns that into a
    /// [`crate::error::RactorError::Closed`].
    pub fn push(&mut self, basket: Basket) -> bool {
        if self.closed {
            return false;
        }
        self.items.push_back(basket);
        true
    }

    /// Pop the oldest basket, if any.
    pub fn pop(&mut self) -> Option<Basket> {
        self.items.pop_front()
    }

    /// True if there is at least one basket ready to pop.
    pub fn has_ready(&self) -> bool {
        !self.items.is_empty()
    }

    /// Number of baskets currently queued.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no baskets are queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mark the queue closed. Idempotent. Already-queued baskets remain
    /// poppable — closing stops new sends, it does not discard history.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// True once [`Queue::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::BasketKind;
    use crate::util::{ActorId, MessageSeq};
    use crate::value::RValue;
    use std::sync::Arc;

    fn basket(n: i64) -> Basket {
        Basket::new(
            BasketKind::Shareable(Arc::new(RValue::Int(n))),
            ActorId::from_raw(1),
            MessageSeq::counter().next(),
        )
    }

    #[test]
    fn push_then_pop_preserves_fifo_order() {
        let mut q = Queue::new();
        assert!(q.push(basket(1)));
        assert!(q.push(basket(2)));
        let first = q.pop().unwrap();
        assert!(matches!(first.kind(), BasketKind::Shareable(v) if **v == RValue::Int(1)));
        let second = q.pop().unwrap();
        assert!(matches!(second.kind(), BasketKind::Shareable(v) if **v == RValue::Int(2)));
        assert!(q.pop().is_none());
    }

    #[test]
    fn empty_queue_has_no_ready_baskets() {
        let q = Queue::new();
        assert!(!q.has_ready());
        assert!(q.is_empty());
    }

    #[test]
    fn closing_rejects_new_pushes_but_keeps_existing() {
        let mut q = Queue::new();
        q.push(basket(1));
        q.close();
        assert!(!q.push(basket(2)));
        assert!(q.is_closed());
        assert_eq!(q.len(), 1);
        assert!(q.pop().is_some());
    }
}
