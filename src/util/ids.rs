//! Monotonic identifiers for Actors, T-Var slots, and baskets.
//!
//! Unlike the random `Uuid` identities the broader runtime uses for
//! message-bus routing, the Actor subsystem needs *order-carrying* ids:
//! the main Actor is always `1`, and a T-Var's slot index doubles as the
//! global lock order for commit.

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Identity of an Actor. Monotonic, process-wide, starting at `1` (the
/// main Actor).
///
/// # Example
///
/// ```rust
/// use ractor_rt::util::ActorId;
///
/// let ids = ActorId::allocator();
/// let main = ids.next();
/// let worker = ids.next();
/// assert_eq!(main, ActorId::MAIN);
/// assert!(worker.as_u32() > main.as_u32());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(u32);

impl ActorId {
    /// The id reserved for the process's main Actor.
    pub const MAIN: ActorId = ActorId(1);

    /// Wrap a raw id. Only meant for use by [`ActorIdAllocator`] and tests.
    pub const fn from_raw(id: u32) -> Self {
        ActorId(id)
    }

    /// The raw numeric id.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// A fresh process-wide allocator, starting the next id at `1`.
    pub fn allocator() -> ActorIdAllocator {
        ActorIdAllocator::default()
    }
}

impl Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Actor:{}>", self.0)
    }
}

/// Issues strictly increasing [`ActorId`]s starting at [`ActorId::MAIN`].
///
/// One allocator is owned by the [`crate::vm::Vm`]; it is never exposed as
/// file-scope global state.
#[derive(Debug, Default)]
pub struct ActorIdAllocator {
    next: AtomicU32,
}

impl ActorIdAllocator {
    /// Allocate the next id.
    pub fn next(&self) -> ActorId {
        let raw = self.next.fetch_add(1, Ordering::Relaxed);
        ActorId(raw + 1)
    }
}

/// Monotonic index of a T-Var [`crate::tvar::Slot`]. Doubles as the global
/// lock order for `tx.commit` and bulk-lock mode (descending index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(u64);

impl SlotIndex {
    /// Wrap a raw index. Only meant for use by [`crate::tvar::Space`].
    pub const fn from_raw(index: u64) -> Self {
        SlotIndex(index)
    }

    /// The raw numeric index.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<TVar:{}>", self.0)
    }
}

/// Monotonic sequence number stamped on each [`crate::basket::Basket`] for
/// diagnostics and FIFO-ordering assertions in tests. Not load-bearing for
/// correctness — the queue itself is what guarantees FIFO delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageSeq(u64);

impl MessageSeq {
    /// A fresh process-wide sequence counter.
    pub fn counter() -> MessageSeqCounter {
        MessageSeqCounter::default()
    }

    /// The raw numeric sequence.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// Issues strictly increasing [`MessageSeq`]s.
#[derive(Debug, Default)]
pub struct MessageSeqCounter {
    next: AtomicU64,
}

impl MessageSeqCounter {
    /// Allocate the next sequence number.
    pub fn next(&self) -> MessageSeq {
        MessageSeq(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
