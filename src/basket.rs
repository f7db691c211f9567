//! C2 — the Basket envelope.
//!
//! A `Basket` is the short-lived wrapper every value travels in between
//! `send`/`yield` and `accept`: it carries the classification tag computed
//! by [`crate::classify`], the payload in whatever shape that
//! classification produced, and the sending Actor's identity.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::util::{ActorId, MessageSeq};
use crate::value::RValue;

/// The classification-tagged payload a [`Basket`] carries.
#[derive(Debug, Clone)]
pub enum BasketKind {
    /// Aliased directly — the receiver sees the exact same allocation the
    /// sender held; no copy, no identity change.
    Shareable(Arc<RValue>),
    /// A fresh, independent deep copy produced by the external serializer.
    CopyMarshal(Vec<u8>),
    /// Ownership transfer: the payload is the shallow-moved shell; the
    /// sender's [`crate::value::Handle`] was tombstoned when this basket
    /// was built.
    Move(RValue),
    /// An encoded cause: the sender's Actor body raised and this basket
    /// carries the failure to whoever takes the outgoing port.
    Exception(Vec<u8>),
}

/// A value envelope in flight between two Actors.
///
/// Baskets are arena-local: one is built by `send`/`yield`, handed to a
/// single receiver via `accept`, and dropped. There is no sharing of a
/// `Basket` itself across Actors — only (for the `Shareable` kind) the
/// `Arc<RValue>` payload inside it.
#[derive(Debug, Clone)]
pub struct Basket {
    kind: BasketKind,
    sender: ActorId,
    seq: MessageSeq,
}

impl Basket {
    /// Build a new basket. `seq` is diagnostic only (see
    /// [`crate::util::MessageSeq`]'s doc comment) — it plays no role in
    /// the FIFO guarantee, which the queue itself provides.
    pub fn new(kind: BasketKind, sender: ActorId, seq: MessageSeq) -> Self {
        Basket { kind, sender, seq }
    }

    /// The classification-tagged payload.
    pub fn kind(&self) -> &BasketKind {
        &self.kind
    }

    /// The Actor that sent this basket.
    pub fn sender(&self) -> ActorId {
        self.sender
    }

    /// Diagnostic sequence number.
    pub fn seq(&self) -> MessageSeq {
        self.seq
    }

    /// True for baskets carrying a re-raised exception rather than a value.
    pub fn is_exception(&self) -> bool {
        matches!(self.kind, BasketKind::Exception(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::MessageSeq;

    #[test]
    fn basket_exposes_sender_and_kind() {
        let seq = MessageSeq::counter().next();
        let basket = Basket::new(
            BasketKind::Shareable(Arc::new(RValue::Int(7))),
            ActorId::from_raw(2),
            seq,
        );
        assert_eq!(basket.sender(), ActorId::from_raw(2));
        assert!(matches!(basket.kind(), BasketKind::Shareable(_)));
        assert!(!basket.is_exception());
    }

    #[test]
    fn exception_basket_is_flagged() {
        let seq = MessageSeq::counter().next();
        let basket = Basket::new(
            BasketKind::Exception(b"boom".to_vec()),
            ActorId::from_raw(1),
            seq,
        );
        assert!(basket.is_exception());
    }
}
