//! C1 — the object classifier.
//!
//! Three predicates (`shareable`) and operations (`copy_setup`,
//! `move_setup`, `accept`) that decide how a value crosses an Actor
//! boundary, plus the debug-only belonging check ([`Owned`]) §4.1 allows
//! in place of the header-bit-stealing the original system used.

mod owned;

pub use owned::Owned;

// Layer 1: Standard library imports
// (none beyond what submodules need)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::basket::{Basket, BasketKind};
use crate::error::RactorError;
use crate::util::{ActorId, MessageSeq};
use crate::value::{Handle, RValue, WireValue};

/// Is `v` safe to alias across Actors without copying?
///
/// True for: immediate scalars (`Nil`/`Bool`/`Int`/`Float`), interned
/// symbols, frozen strings with no extra instance state, and objects
/// explicitly flagged `Shareable` via [`crate::value::RValue::Shared`].
///
/// The source system memoizes this by setting a flag on the object's
/// header the first time it is computed; `RValue`'s classification is a
/// pure function of the variant tag, so that memoization has no
/// counterpart here — dispatch is already O(1).
pub fn shareable(v: &RValue) -> bool {
    matches!(
        v,
        RValue::Nil
            | RValue::Bool(_)
            | RValue::Int(_)
            | RValue::Float(_)
            | RValue::Symbol(_)
            | RValue::FrozenString(_)
            | RValue::Shared(_)
    )
}

/// Build a basket for `send`/`yield` without `move`: shareable values are
/// aliased, everything else is deep-copied through the external
/// serializer.
pub fn copy_setup(
    v: RValue,
    sender: ActorId,
    seq: MessageSeq,
) -> Result<Basket, RactorError> {
    if shareable(&v) {
        Ok(Basket::new(
            BasketKind::Shareable(std::sync::Arc::new(v)),
            sender,
            seq,
        ))
    } else {
        let wire = WireValue::try_from(&v)?;
        let bytes = serde_json::to_vec(&wire)
            .map_err(|e| RactorError::Transaction(format!("encode failed: {e}")))?;
        Ok(Basket::new(BasketKind::CopyMarshal(bytes), sender, seq))
    }
}

/// Build a basket for `send`/`yield` with `move`: invalidates `handle` and
/// records the shallow-moved shell.
///
/// - Shareable values need no move — aliased as usual.
/// - Byte-string/array-like values are shallow-moved: the handle is
///   tombstoned and the shell becomes the basket payload. Arrays recurse
///   into each non-shareable element, tombstoning nothing (elements are
///   owned data, not independently-held handles) but re-validating that
///   every element is either shareable or move-able.
/// - Anything else fails with [`RactorError::CannotMove`].
pub fn move_setup(
    handle: &Handle,
    sender: ActorId,
    seq: MessageSeq,
) -> Result<Basket, RactorError> {
    let snapshot = handle.get()?;
    if shareable(&snapshot) {
        return Ok(Basket::new(
            BasketKind::Shareable(std::sync::Arc::new(snapshot)),
            sender,
            seq,
        ));
    }
    let shell = handle.take_for_move()?;
    let moved = shallow_move(shell)?;
    Ok(Basket::new(BasketKind::Move(moved), sender, seq))
}

/// Recursive shallow-move helper used by [`move_setup`] and, for nested
/// array elements, by itself.
fn shallow_move(v: RValue) -> Result<RValue, RactorError> {
    match v {
        RValue::String(_) | RValue::Bytes(_) => Ok(v),
        RValue::Array(items) => {
            let mut moved = Vec::with_capacity(items.len());
            for item in items {
                if shareable(&item) {
                    moved.push(item);
                } else {
                    moved.push(shallow_move(item)?);
                }
            }
            Ok(RValue::Array(moved))
        }
        _ => Err(RactorError::CannotMove),
    }
}

/// Unwrap a basket on the receiving side.
///
/// - `Shareable`: returned as-is (cloning the enum is cheap; the `Arc`
///   payload inside `Shared` is the part that is actually shared).
/// - `CopyMarshal`: decoded through the external serializer.
/// - `Move`: the belonging tag is set to `receiver` (debug-only check,
///   see [`Owned`]) and the shell is returned.
/// - `Exception`: decoded and turned into a [`RactorError::Remote`].
pub fn accept(basket: Basket, receiver: ActorId) -> Result<RValue, RactorError> {
    let sender = basket.sender();
    match basket.kind().clone() {
        BasketKind::Shareable(arc) => Ok((*arc).clone()),
        BasketKind::CopyMarshal(bytes) => {
            let wire: WireValue = serde_json::from_slice(&bytes)
                .map_err(|e| RactorError::Transaction(format!("decode failed: {e}")))?;
            Ok(RValue::from(wire))
        }
        BasketKind::Move(shell) => {
            // Belonging setup: tag the shell to `receiver` before handing
            // it back. `Owned::new` + immediate `.get` is the debug-only
            // check in its simplest usable form (§4.1's "tagging each with
            // the receiving Actor's id").
            let owned = Owned::new(receiver, shell);
            Ok(owned.get(receiver).clone())
        }
        BasketKind::Exception(bytes) => {
            let cause: String = serde_json::from_slice(&bytes)
                .map_err(|e| RactorError::Transaction(format!("decode failed: {e}")))?;
            Err(RactorError::remote(sender, cause))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq() -> MessageSeq {
        MessageSeq::counter().next()
    }

    #[test]
    fn scalars_are_shareable() {
        assert!(shareable(&RValue::Nil));
        assert!(shareable(&RValue::Int(1)));
        assert!(shareable(&RValue::Bool(true)));
        assert!(shareable(&RValue::Symbol(std::sync::Arc::from("ok"))));
        assert!(shareable(&RValue::FrozenString(std::sync::Arc::from("ok"))));
    }

    #[test]
    fn mutable_containers_are_not_shareable() {
        assert!(!shareable(&RValue::String("hi".into())));
        assert!(!shareable(&RValue::Bytes(vec![1, 2, 3])));
        assert!(!shareable(&RValue::Array(vec![RValue::Int(1)])));
    }

    #[test]
    fn copy_setup_of_shareable_value_aliases() {
        let basket = copy_setup(RValue::Int(9), ActorId::from_raw(1), seq()).unwrap();
        assert!(matches!(basket.kind(), BasketKind::Shareable(_)));
    }

    #[test]
    fn copy_setup_of_mutable_value_marshals() {
        let basket =
            copy_setup(RValue::String("hi".into()), ActorId::from_raw(1), seq()).unwrap();
        assert!(matches!(basket.kind(), BasketKind::CopyMarshal(_)));
    }

    #[test]
    fn move_setup_invalidates_the_handle() {
        let handle = Handle::new(RValue::Array(vec![RValue::Int(1), RValue::Int(2)]));
        let basket = move_setup(&handle, ActorId::from_raw(1), seq()).unwrap();
        assert!(matches!(basket.kind(), BasketKind::Move(_)));
        assert!(handle.is_moved());
        assert!(matches!(handle.get(), Err(RactorError::Moved)));
    }

    #[test]
    fn move_setup_of_shareable_value_does_not_invalidate() {
        let handle = Handle::new(RValue::Int(42));
        let basket = move_setup(&handle, ActorId::from_raw(1), seq()).unwrap();
        assert!(matches!(basket.kind(), BasketKind::Shareable(_)));
        assert!(!handle.is_moved());
    }

    #[test]
    fn move_setup_rejects_unmoveable_object() {
        use crate::value::SharedObject;
        use std::any::Any;

        #[derive(Debug)]
        struct Opaque;
        impl SharedObject for Opaque {
            fn type_name(&self) -> &'static str {
                "Opaque"
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let handle = Handle::new(RValue::Object(std::sync::Arc::new(Opaque)));
        let err = move_setup(&handle, ActorId::from_raw(1), seq()).unwrap_err();
        assert!(matches!(err, RactorError::CannotMove));
    }

    #[test]
    fn move_setup_recurses_into_array_elements() {
        let handle = Handle::new(RValue::Array(vec![
            RValue::String("a".into()),
            RValue::Int(1),
            RValue::Array(vec![RValue::Bytes(vec![1, 2])]),
        ]));
        let basket = move_setup(&handle, ActorId::from_raw(1), seq()).unwrap();
        assert!(matches!(basket.kind(), BasketKind::Move(_)));
    }

    #[test]
    fn accept_roundtrips_copy_marshal() {
        let basket =
            copy_setup(RValue::String("payload".into()), ActorId::from_raw(1), seq()).unwrap();
        let v = accept(basket, ActorId::from_raw(2)).unwrap();
        assert_eq!(v, RValue::String("payload".into()));
    }

    #[test]
    fn accept_decodes_exception_basket() {
        let bytes = serde_json::to_vec("boom").unwrap();
        let basket = Basket::new(BasketKind::Exception(bytes), ActorId::from_raw(1), seq());
        let err = accept(basket, ActorId::from_raw(2)).unwrap_err();
        assert!(matches!(err, RactorError::Remote { .. }));
    }
}
