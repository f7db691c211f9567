//! The runtime entry point: one [`Vm`], one [`tvar::Space`], built from a
//! [`SystemConfig`].
//!
//! Neither `ractor.c` nor spec.md has a single object playing this role —
//! a process just has "the" VM. A standalone crate needs something a
//! caller can own and pass around instead of relying on process-wide
//! statics, so `Runtime` plays that role, the way `ActorSystem` did in
//! the source tree this crate grew out of.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::actor::{spawn_worker, ActorHandle};
use crate::error::RactorError;
use crate::rendezvous::Ctx;
use crate::tvar;
use crate::util::ActorId;
use crate::value::RValue;
use crate::vm::Vm;

use super::{SystemConfig, SystemError};

/// An isolated runtime: its own Actor registry and its own transactional
/// memory area, configured once at construction.
///
/// # Examples
///
/// ```rust
/// use ractor_rt::system::Runtime;
/// use ractor_rt::value::RValue;
///
/// let runtime = Runtime::builder().build();
/// let mut handle = runtime.spawn(None, |ctx| {
///     ctx.receive()
/// });
/// runtime.send(handle.actor(), RValue::Int(1)).unwrap();
/// handle.join();
/// ```
pub struct Runtime {
    vm: Arc<Vm>,
    space: Arc<tvar::Space>,
    config: SystemConfig,
}

impl Runtime {
    /// Start building a `Runtime` with non-default configuration.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// A runtime with default configuration.
    pub fn new() -> Self {
        Builder::default().build()
    }

    /// This runtime's configuration.
    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    /// The always-present main Actor.
    pub fn main_actor(&self) -> Arc<crate::actor::Actor> {
        self.vm.main()
    }

    /// A [`Ctx`] bound to the main Actor — useful for driving rendezvous
    /// calls from outside any spawned Actor's own worker thread (tests,
    /// a synchronous `main`).
    pub fn main_ctx(&self) -> Ctx {
        Ctx::new(Arc::clone(&self.vm), self.vm.main())
    }

    /// Spawn a new Actor running `body` on its own thread. `body` is
    /// handed a [`Ctx`] bound to the new Actor.
    pub fn spawn<F>(&self, name: Option<Arc<str>>, body: F) -> ActorHandle
    where
        F: FnOnce(Ctx) -> Result<RValue, RactorError> + Send + 'static,
    {
        let vm = Arc::clone(&self.vm);
        spawn_worker(Arc::clone(&vm), name, move |actor, vm| {
            body(Ctx::new(vm, actor))
        })
    }

    /// Look up a registered Actor by id.
    pub fn lookup(&self, id: ActorId) -> Result<Arc<crate::actor::Actor>, SystemError> {
        self.vm.lookup(id).ok_or(SystemError::ActorNotFound(id))
    }

    /// Send a value to `target`'s incoming port from outside any Actor
    /// body, attributed to the main Actor.
    pub fn send(&self, target: &Arc<crate::actor::Actor>, value: RValue) -> Result<(), RactorError> {
        self.main_ctx().send(target, value)
    }

    /// This runtime's transactional memory area.
    pub fn space(&self) -> &tvar::Space {
        &self.space
    }

    /// Stop-the-world: terminate every registered Actor and close its
    /// incoming port.
    pub fn shutdown(&self) {
        self.vm.terminate_all();
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent builder for [`Runtime`].
#[derive(Debug, Default)]
pub struct Builder {
    config: SystemConfig,
}

impl Builder {
    /// Use `config` instead of [`SystemConfig::default`].
    pub fn with_config(mut self, config: SystemConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable the belonging check.
    pub fn with_belonging_check(mut self, enabled: bool) -> Self {
        self.config.belonging_check = enabled;
        self
    }

    /// Enable or disable fair `select`.
    pub fn with_fair_select(mut self, enabled: bool) -> Self {
        self.config.fair_select = enabled;
        self
    }

    /// Build the runtime.
    pub fn build(self) -> Runtime {
        Runtime {
            vm: Arc::new(Vm::with_config(&self.config)),
            space: Arc::new(tvar::Space::with_config(&self.config)),
            config: self.config,
        }
    }
}
