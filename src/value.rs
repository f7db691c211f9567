//! The value representation the Actor subsystem transfers between Actors
//! and stores in T-Vars.
//!
//! The embedding language's object representation is out of scope for the
//! core subsystem (spec.md §1) — but a standalone crate still needs *some*
//! concrete value type to classify, move, and transfer. `RValue` plays
//! that role: a small closed enum covering the shapes spec.md's classifier
//! talks about (immutable scalars, frozen strings, byte-strings,
//! ordered sequences, and explicitly-flagged shareable objects), plus
//! [`Handle`], the heap-identity stand-in that lets "the source handle is
//! invalidated after a move" be an observable, testable property.

// Layer 1: Standard library imports
use std::any::Any;
use std::fmt;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::error::RactorError;

/// A value that can be sent, yielded, or stored in a T-Var.
///
/// Classification (§4.1) dispatches on the variant:
/// - `Nil`/`Bool`/`Int`/`Float`/`Symbol`/`FrozenString`/`Shared` are always
///   shareable (immediate scalars, frozen/deeply-immutable objects, or
///   objects explicitly flagged `Shareable`).
/// - `String`/`Bytes` are byte-string-like and are the shallow-move
///   candidates of §4.1's `move_setup`.
/// - `Array` is the ordered-sequence case: shallow-moved as a container,
///   then recursed into per element.
#[derive(Debug, Clone)]
pub enum RValue {
    /// The absence of a value.
    Nil,
    /// An immediate boolean scalar.
    Bool(bool),
    /// An immediate integer scalar.
    Int(i64),
    /// An immediate float scalar.
    Float(f64),
    /// An interned, always-frozen symbol.
    Symbol(Arc<str>),
    /// A frozen string with no extra instance state — deeply immutable.
    FrozenString(Arc<str>),
    /// A plain, mutable string — not shareable, shallow-movable.
    String(String),
    /// A byte-string/file-handle-like blob — not shareable, shallow-movable.
    Bytes(Vec<u8>),
    /// An ordered sequence — not shareable itself; elements are classified
    /// independently during a move.
    Array(Vec<RValue>),
    /// A user object explicitly flagged `Shareable` (spec.md §4.1(b)).
    Shared(Arc<dyn SharedObject>),
    /// An opaque user object that is neither shareable nor byte-string/
    /// array-like — e.g. a handle wrapping a non-frozen external
    /// resource. Can be copy-marshaled only if the embedder's serializer
    /// supports it; cannot be moved (§4.1's `CannotMove` case).
    Object(Arc<dyn SharedObject>),
}

/// Marker for a user-defined object explicitly flagged `Shareable`.
///
/// Equivalent to calling `Ractor.make_shareable` in the source system:
/// the embedder asserts the object is safe to alias across Actors without
/// the classifier needing to prove deep immutability itself.
pub trait SharedObject: Send + Sync + fmt::Debug + Any {
    /// A short name for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Upcast for identity comparisons (`Arc::ptr_eq`-style checks in
    /// tests live at the `Arc<dyn SharedObject>` level, not here).
    fn as_any(&self) -> &dyn Any;
}

impl PartialEq for RValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RValue::Nil, RValue::Nil) => true,
            (RValue::Bool(a), RValue::Bool(b)) => a == b,
            (RValue::Int(a), RValue::Int(b)) => a == b,
            (RValue::Float(a), RValue::Float(b)) => a == b,
            (RValue::Symbol(a), RValue::Symbol(b)) => a == b,
            (RValue::FrozenString(a), RValue::FrozenString(b)) => a == b,
            (RValue::String(a), RValue::String(b)) => a == b,
            (RValue::Bytes(a), RValue::Bytes(b)) => a == b,
            (RValue::Array(a), RValue::Array(b)) => a == b,
            (RValue::Shared(a), RValue::Shared(b)) => Arc::ptr_eq(a, b),
            (RValue::Object(a), RValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Serializable mirror of [`RValue`], used only by `classify::copy_setup`'s
/// `encode`/`decode` path (the `CopyMarshal` basket kind). `Shared` values
/// are never encoded this way — they are always sent as `Shareable`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) enum WireValue {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Symbol(String),
    FrozenString(String),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<WireValue>),
}

impl TryFrom<&RValue> for WireValue {
    type Error = RactorError;

    fn try_from(v: &RValue) -> Result<Self, Self::Error> {
        Ok(match v {
            RValue::Nil => WireValue::Nil,
            RValue::Bool(b) => WireValue::Bool(*b),
            RValue::Int(i) => WireValue::Int(*i),
            RValue::Float(f) => WireValue::Float(*f),
            RValue::Symbol(s) => WireValue::Symbol(s.to_string()),
            RValue::FrozenString(s) => WireValue::FrozenString(s.to_string()),
            RValue::String(s) => WireValue::String(s.clone()),
            RValue::Bytes(b) => WireValue::Bytes(b.clone()),
            RValue::Array(items) => {
                let mut wire = Vec::with_capacity(items.len());
                for item in items {
                    wire.push(WireValue::try_from(item)?);
                }
                WireValue::Array(wire)
            }
            RValue::Shared(_) | RValue::Object(_) => return Err(RactorError::CannotMove),
        })
    }
}

impl From<WireValue> for RValue {
    fn from(v: WireValue) -> Self {
        match v {
            WireValue::Nil => RValue::Nil,
            WireValue::Bool(b) => RValue::Bool(b),
            WireValue::Int(i) => RValue::Int(i),
            WireValue::Float(f) => RValue::Float(f),
            WireValue::Symbol(s) => RValue::Symbol(Arc::from(s)),
            WireValue::FrozenString(s) => RValue::FrozenString(Arc::from(s)),
            WireValue::String(s) => RValue::String(s),
            WireValue::Bytes(b) => RValue::Bytes(b),
            WireValue::Array(items) => RValue::Array(items.into_iter().map(RValue::from).collect()),
        }
    }
}

#[derive(Debug)]
enum Slot {
    Present(RValue),
    Moved,
}

/// A heap-identity stand-in: the thing a sender holds a reference to.
///
/// In an embedding language with a GC'd object representation, "moving a
/// value out of an Actor" rewrites the object's header in place so every
/// other reference to it observes the tombstone. Rust has no such shared,
/// mutable, GC'd header to rewrite, so `Handle` plays that role explicitly:
/// it is a shared, lock-guarded cell that starts `Present` and becomes
/// `Moved` exactly once, the moment the value crosses into another Actor.
///
/// # Example
///
/// ```rust
/// use ractor_rt::value::{Handle, RValue};
///
/// let h = Handle::new(RValue::Array(vec![RValue::Int(1), RValue::Int(2)]));
/// let moved = h.take_for_move().unwrap();
/// assert!(matches!(moved, RValue::Array(_)));
/// assert!(h.get().is_err()); // MovedError
/// ```
#[derive(Debug, Clone)]
pub struct Handle(Arc<Mutex<Slot>>);

impl Handle {
    /// Wrap a value in a fresh, present handle.
    pub fn new(value: RValue) -> Self {
        Handle(Arc::new(Mutex::new(Slot::Present(value))))
    }

    /// Read the current value. Fails with [`RactorError::Moved`] once the
    /// handle has been moved out.
    pub fn get(&self) -> Result<RValue, RactorError> {
        match &*self.0.lock() {
            Slot::Present(v) => Ok(v.clone()),
            Slot::Moved => Err(RactorError::Moved),
        }
    }

    /// True once this handle has been moved out.
    pub fn is_moved(&self) -> bool {
        matches!(&*self.0.lock(), Slot::Moved)
    }

    /// Consume the value for a move: atomically takes the value out and
    /// leaves the handle tombstoned. Fails if already moved.
    pub fn take_for_move(&self) -> Result<RValue, RactorError> {
        let mut guard = self.0.lock();
        match std::mem::replace(&mut *guard, Slot::Moved) {
            Slot::Present(v) => Ok(v),
            Slot::Moved => {
                // restore the tombstone we just (redundantly) wrote and fail
                *guard = Slot::Moved;
                Err(RactorError::Moved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_read_after_move_fails() {
        let h = Handle::new(RValue::Int(42));
        assert!(h.take_for_move().is_ok());
        assert!(matches!(h.get(), Err(RactorError::Moved)));
        assert!(h.is_moved());
    }

    #[test]
    fn handle_double_move_fails() {
        let h = Handle::new(RValue::Int(1));
        assert!(h.take_for_move().is_ok());
        assert!(h.take_for_move().is_err());
    }

    #[test]
    fn wire_roundtrip_preserves_structural_equality() {
        let v = RValue::Array(vec![
            RValue::Int(1),
            RValue::String("hi".into()),
            RValue::Bool(true),
        ]);
        let wire = WireValue::try_from(&v).unwrap();
        let json = serde_json::to_vec(&wire).unwrap();
        let decoded: WireValue = serde_json::from_slice(&json).unwrap();
        let back = RValue::from(decoded);
        assert_eq!(v, back);
    }

    #[test]
    fn shared_values_cannot_be_wire_encoded() {
        #[derive(Debug)]
        struct Dummy;
        impl SharedObject for Dummy {
            fn type_name(&self) -> &'static str {
                "Dummy"
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
        }
        let v = RValue::Shared(Arc::new(Dummy));
        assert!(WireValue::try_from(&v).is_err());
    }
}
