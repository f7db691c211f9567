//! Actor system framework with lifecycle management.
//!
//! Provides the main entry point for the actor runtime system.

pub mod config;
pub mod errors;
pub mod runtime;

// Re-exports
pub use config::{
    SystemConfig, SystemConfigBuilder, DEFAULT_BELONGING_CHECK, DEFAULT_ENABLE_MONITORING,
    DEFAULT_FAIR_SELECT,
};
pub use errors::SystemError;
pub use runtime::{Builder, Runtime};
