//! The Actor subsystem's error hierarchy.
//!
//! Every user-visible error kind from the design's error table lives here
//! as one variant of [`RactorError`]. `RetryTransaction` is deliberately
//! absent — it never escapes [`crate::tvar::atomically`].

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::ActorId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RactorError>;

/// Every user-visible failure the Actor subsystem can report.
///
/// Fatal invariant violations (lock-order breaks, belonging mismatches,
/// impossible states) are *not* represented here — they abort the process
/// via [`fatal`] rather than returning a `Result`, matching the "Fatal
/// (bug)" row of the error table.
#[derive(Debug, Error)]
pub enum RactorError {
    /// Sent to a closed incoming port, received from a closed+empty port,
    /// or taken from a closed outgoing port.
    #[error("port closed on actor {actor}")]
    Closed {
        /// The Actor whose port was closed.
        actor: ActorId,
    },

    /// Access to an object whose class was rewritten to `MovedObject`.
    #[error("object was moved out of this actor and can no longer be accessed")]
    Moved,

    /// `move` was requested on a type the shallow mover does not support.
    #[error("cannot move a value of this type between actors")]
    CannotMove,

    /// A taker decoded an `Exception` basket.
    #[error("actor {sender} raised an error: {cause}")]
    Remote {
        /// The Actor that raised the original error.
        sender: ActorId,
        /// Human-readable rendering of the original cause.
        cause: String,
    },

    /// Two concurrent selects from the same Actor registered on the same
    /// peer's `taking_list`.
    #[error("actor {actor} is already waiting to take from this peer")]
    AlreadyWaiting {
        /// The Actor that attempted the duplicate registration.
        actor: ActorId,
    },

    /// `tvar.value = v` outside a transaction, a nested `lock`, or growing
    /// a pessimistic-lock transaction after `stop_adding` was set.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// `select`'s argument was neither `self` nor a peer `Actor`.
    #[error("select: argument must be a peer actor, a yield value, or self")]
    Argument,

    /// A blocking rendezvous call was woken by `Wakeup::ByInterrupt`
    /// (cooperative cancellation) rather than completing normally.
    #[error("actor {actor} was interrupted while waiting")]
    Interrupted {
        /// The Actor that was interrupted.
        actor: ActorId,
    },
}

impl RactorError {
    /// Closed-port helper.
    pub fn closed(actor: ActorId) -> Self {
        RactorError::Closed { actor }
    }

    /// Remote-exception helper.
    pub fn remote(sender: ActorId, cause: impl fmt::Display) -> Self {
        RactorError::Remote {
            sender,
            cause: cause.to_string(),
        }
    }

    /// Interrupted-while-waiting helper.
    pub fn interrupted(actor: ActorId) -> Self {
        RactorError::Interrupted { actor }
    }

    /// True for errors a caller could plausibly retry (closed ports are
    /// terminal, but `AlreadyWaiting` reflects a racing registration that
    /// may clear).
    pub fn is_transient(&self) -> bool {
        matches!(self, RactorError::AlreadyWaiting { .. })
    }
}

/// Internal signal consumed by [`crate::tvar::atomically`]; never returned
/// to a caller outside the STM module.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryTransaction;

/// Abort the process on a violated invariant (lock-order break, belonging
/// mismatch, impossible state). This is the one place the crate allows
/// itself to panic outright, matching spec.md's "Fatal (bug)" error kind.
#[allow(clippy::panic)]
pub fn fatal(context: &str) -> ! {
    panic!("ractor-rt: fatal invariant violation: {context}");
}
