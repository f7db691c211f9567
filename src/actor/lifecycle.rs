//! Actor status machine.
//!
//! Every Actor moves through four states in order; the only back-edge is
//! `Running` ↔ `Blocking`, taken every time the Actor body calls a
//! rendezvous operation that cannot complete immediately.
//!
//! ```text
//! Created -> Blocking <-> Running -> Terminated
//! ```

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
// (none)

/// Where an Actor currently sits in its lifecycle.
///
/// # Examples
///
/// ```rust
/// use ractor_rt::actor::ActorStatus;
///
/// let status = ActorStatus::Created;
/// assert_eq!(status, ActorStatus::Created);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorStatus {
    /// Registered with the VM but its worker thread has not started yet.
    Created,
    /// Parked on a rendezvous primitive (`receive`/`take`/`yield`/`select`).
    Blocking,
    /// Executing its body.
    Running,
    /// Exited — normally or by raising. Dead baskets sent to it fail with
    /// [`crate::error::RactorError::Closed`].
    Terminated,
}

impl Default for ActorStatus {
    fn default() -> Self {
        Self::Created
    }
}

/// Tracks status transitions and their timestamps for diagnostics.
///
/// # Examples
///
/// ```rust
/// use ractor_rt::actor::{ActorLifecycle, ActorStatus};
///
/// let mut lifecycle = ActorLifecycle::new();
/// assert_eq!(lifecycle.status(), ActorStatus::Created);
///
/// lifecycle.transition_to(ActorStatus::Running);
/// assert_eq!(lifecycle.status(), ActorStatus::Running);
/// ```
#[derive(Debug, Clone)]
pub struct ActorLifecycle {
    status: ActorStatus,
    created_at: DateTime<Utc>,
    last_transition: DateTime<Utc>,
}

impl ActorLifecycle {
    /// A fresh lifecycle tracker in `Created`.
    pub fn new() -> Self {
        let now = Utc::now();
        ActorLifecycle {
            status: ActorStatus::Created,
            created_at: now,
            last_transition: now,
        }
    }

    /// Move to `new_status`, stamping the transition time.
    pub fn transition_to(&mut self, new_status: ActorStatus) {
        self.status = new_status;
        self.last_transition = Utc::now();
    }

    /// Current status.
    pub fn status(&self) -> ActorStatus {
        self.status
    }

    /// When this Actor was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When `status` last changed.
    pub fn last_transition(&self) -> DateTime<Utc> {
        self.last_transition
    }

    /// True once the Actor is `Terminated`.
    pub fn is_terminal(&self) -> bool {
        self.status == ActorStatus::Terminated
    }
}

impl Default for ActorLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lifecycle_starts_created() {
        let lifecycle = ActorLifecycle::new();
        assert_eq!(lifecycle.status(), ActorStatus::Created);
        assert!(!lifecycle.is_terminal());
    }

    #[test]
    fn transition_updates_status_and_timestamp() {
        let mut lifecycle = ActorLifecycle::new();
        let created = lifecycle.last_transition();
        std::thread::sleep(std::time::Duration::from_millis(5));
        lifecycle.transition_to(ActorStatus::Running);
        assert_eq!(lifecycle.status(), ActorStatus::Running);
        assert!(lifecycle.last_transition() >= created);
    }

    #[test]
    fn terminated_is_terminal() {
        let mut lifecycle = ActorLifecycle::new();
        lifecycle.transition_to(ActorStatus::Terminated);
        assert!(lifecycle.is_terminal());
    }
}
