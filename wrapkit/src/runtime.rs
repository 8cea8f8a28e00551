//! Explicit bootstrap for a store and its configuration

use tracing::debug;
use wrapkit_store::{IdentityStore, MemoryStore};
use wrapkit_types::{Result, WrapError};

use crate::config::RuntimeConfig;

/// Owns the identity store and the configuration it was built from.
///
/// Wrap it in a `Mutex` to share it across threads.
#[derive(Debug)]
pub struct Runtime<S: IdentityStore = MemoryStore> {
    store: S,
    config: RuntimeConfig,
}

impl Runtime<MemoryStore> {
    /// Validate `config` and build an in-memory store with its limits
    pub fn init(config: RuntimeConfig) -> Result<Self> {
        config.validate()?;
        let store = MemoryStore::with_limits(config.limits.clone());
        debug!(max_members = config.limits.max_members, "runtime initialized");
        Ok(Self { store, config })
    }
}

impl<S: IdentityStore> Runtime<S> {
    /// Use an existing store. Its own limits stay in force.
    pub fn with_store(store: S, config: RuntimeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Shared access to the store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Exclusive access to the store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Configuration this runtime was built from
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Tear down, handing the store back.
    ///
    /// Fails if any wrapper still holds members, since those objects would
    /// be dropped with the store.
    pub fn shutdown(self) -> Result<S> {
        let remaining = self.store.len();
        if remaining > 0 {
            return Err(WrapError::Store(format!(
                "{} entries still held at shutdown",
                remaining
            )));
        }
        debug!("runtime shut down");
        Ok(self.store)
    }
}
