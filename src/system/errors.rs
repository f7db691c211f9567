//! Runtime-level error types: everything that can go wrong building or
//! tearing down a [`super::Runtime`], as distinct from the per-operation
//! [`crate::error::RactorError`] a rendezvous call returns.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use thiserror::Error;

// Layer 3: Internal
use crate::util::ActorId;

/// Errors raised while building or operating a [`super::Runtime`].
#[derive(Error, Debug)]
pub enum SystemError {
    /// Actor with the given id is not registered (already terminated and
    /// retired, or never existed).
    #[error("actor not found: {0}")]
    ActorNotFound(ActorId),

    /// `SystemConfig::validate` rejected a configuration value.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The worker thread backing an Actor failed to start.
    #[error("failed to spawn actor: {0}")]
    SpawnFailed(String),
}

impl SystemError {
    /// Config errors are the only ones worth surfacing before any Actor
    /// has run; everything else reflects runtime state.
    pub fn is_config_error(&self) -> bool {
        matches!(self, SystemError::ConfigError(_))
    }
}
