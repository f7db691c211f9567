//! Debug-only belonging check (§4.1, §9).
//!
//! The source system stashes the owning Actor's id in the high bits of a
//! non-shareable object's header and asserts it matches the current Actor
//! on every VM operation that touches the object. Design note §9 asks a
//! rewrite to represent that as type-state instead of header-bit-stealing:
//! [`Owned<T>`] is a wrapper that can only be read by the Actor it names as
//! owner, and aborts the process (per the "Fatal (bug)" error kind)
//! otherwise.

use crate::error::fatal;
use crate::util::ActorId;

/// A value tagged with the Actor that currently owns it.
#[derive(Debug)]
pub struct Owned<T> {
    owner: ActorId,
    value: T,
}

impl<T> Owned<T> {
    /// Tag `value` as owned by `owner`.
    pub fn new(owner: ActorId, value: T) -> Self {
        Owned { owner, value }
    }

    /// The current owner.
    pub fn owner(&self) -> ActorId {
        self.owner
    }

    /// Read the value, asserting `current` matches the recorded owner.
    ///
    /// A mismatch is a belonging-check violation — a bug in the caller,
    /// not a recoverable user error — so it aborts the process rather
    /// than returning a `Result`, matching spec.md §7's "Fatal (bug)" row.
    pub fn get(&self, current: ActorId) -> &T {
        if current != self.owner {
            fatal(&format!(
                "belonging mismatch: owned by {} but accessed by {current}",
                self.owner
            ));
        }
        &self.value
    }

    /// Re-tag ownership, e.g. after a move hands the value to a new
    /// receiver.
    pub fn retag(self, new_owner: ActorId) -> Self {
        Owned {
            owner: new_owner,
            value: self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_can_read_its_value() {
        let owned = Owned::new(ActorId::from_raw(1), 42);
        assert_eq!(*owned.get(ActorId::from_raw(1)), 42);
    }

    #[test]
    fn retag_changes_owner() {
        let owned = Owned::new(ActorId::from_raw(1), "hi");
        let retagged = owned.retag(ActorId::from_raw(2));
        assert_eq!(retagged.owner(), ActorId::from_raw(2));
        assert_eq!(*retagged.get(ActorId::from_raw(2)), "hi");
    }
}
