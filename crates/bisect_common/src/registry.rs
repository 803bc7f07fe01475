//! Unit registry - name-based loading with a process-wide load cache.
//!
//! The registry is the static dispatch table standing in for a dynamic
//! module system: the surrounding build registers each loadable unit's
//! initializer under its dotted name, and `load` resolves names at runtime.
//! A unit initializes at most once per process; repeat loads short-circuit
//! through the loaded-set. A failed load is not remembered, so the next
//! probe of that unit retries the loader.

use std::any::Any;
use std::collections::HashSet;
use std::panic;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::LoadError;

/// Loader for one named unit. Runs the unit's top-level initialization.
pub type Loader = fn() -> anyhow::Result<()>;

/// How a successful load completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The loader ran for the first time in this process.
    Loaded,
    /// The unit was already loaded; the loader was not invoked again.
    CacheHit,
}

/// Name-to-loader table plus the set of units already loaded.
pub struct Registry {
    units: Vec<(String, Loader)>,
    loaded: Mutex<HashSet<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            units: Vec::new(),
            loaded: Mutex::new(HashSet::new()),
        }
    }

    /// Register a loader under `name`. Re-registering a name replaces its
    /// loader; registration order is preserved otherwise.
    pub fn register(&mut self, name: impl Into<String>, loader: Loader) {
        let name = name.into();
        if let Some(slot) = self.units.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = loader;
        } else {
            self.units.push((name, loader));
        }
    }

    /// Registered unit names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.units.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Whether `name` has already been loaded in this process.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.lock().unwrap().contains(name)
    }

    /// Attempt to load `name`, honoring the load cache.
    ///
    /// Loader panics are caught here and reported as `LoadError::Init`, so a
    /// unit that blows up during its top-level initialization is observed
    /// the same way as one that returns an error.
    pub fn load(&self, name: &str) -> Result<LoadStatus, LoadError> {
        if self.is_loaded(name) {
            debug!("load cache hit: {}", name);
            return Ok(LoadStatus::CacheHit);
        }

        let loader = self
            .units
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, loader)| *loader)
            .ok_or_else(|| LoadError::UnknownUnit(name.to_string()))?;

        // The default hook prints its own message to stderr before the
        // unwind reaches the catch below; silence it while the loader runs.
        let prev_hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let unwound = panic::catch_unwind(loader);
        panic::set_hook(prev_hook);

        match unwound {
            Ok(Ok(())) => {
                self.loaded.lock().unwrap().insert(name.to_string());
                debug!("loaded unit: {}", name);
                Ok(LoadStatus::Loaded)
            }
            Ok(Err(err)) => {
                let message = format!("{:#}", err);
                warn!("unit {} failed to initialize: {}", name, message);
                Err(LoadError::Init {
                    unit: name.to_string(),
                    message,
                })
            }
            Err(payload) => {
                let message = panic_message(payload);
                warn!("unit {} panicked during initialization: {}", name, message);
                Err(LoadError::Init {
                    unit: name.to_string(),
                    message,
                })
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a printable message from a panic payload.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unit initialization panicked".to_string()
    }
}
