//! In-memory identity store

use crate::store::IdentityStore;
use ahash::{AHashMap, AHashSet};
use std::any::Any;
use tracing::trace;
use wrapkit_types::{Identity, Limits, Object, Rejected, Result, TypeName, WrapError};

/// One stored object plus the canonical type it was stored as.
struct Entry {
    type_name: TypeName,
    value: Box<dyn Any + Send>,
}

/// Counters describing store activity since creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Identities minted
    pub identities_minted: u64,
    /// Identities retired
    pub identities_released: u64,
    /// Successful puts
    pub puts: u64,
    /// Successful deletes
    pub deletes: u64,
}

/// Identity store backed by hash maps.
///
/// Identities are minted sequentially starting at 1, so runs are reproducible.
pub struct MemoryStore {
    next_identity: u64,
    live: AHashSet<Identity>,
    entries: AHashMap<(Identity, Identity), Entry>,
    owned: AHashMap<Identity, usize>,
    limits: Limits,
    stats: StoreStats,
}

impl MemoryStore {
    /// Create an empty store with default limits
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create an empty store enforcing `limits`
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            next_identity: 1,
            live: AHashSet::new(),
            entries: AHashMap::new(),
            owned: AHashMap::new(),
            limits,
            stats: StoreStats::default(),
        }
    }

    /// Activity counters
    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    /// True if `identity` was minted here and not yet released
    pub fn is_live(&self, identity: Identity) -> bool {
        self.live.contains(&identity)
    }

    /// Canonical type stored under `(owner, key)`, if any
    pub fn type_of(&self, owner: Identity, key: Identity) -> Option<&TypeName> {
        self.entries.get(&(owner, key)).map(|entry| &entry.type_name)
    }

    fn entry(&self, owner: Identity, key: Identity) -> Result<&Entry> {
        self.entries
            .get(&(owner, key))
            .ok_or_else(|| missing(owner, key))
    }

    fn entry_mut(&mut self, owner: Identity, key: Identity) -> Result<&mut Entry> {
        self.entries
            .get_mut(&(owner, key))
            .ok_or_else(|| missing(owner, key))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("live_identities", &self.live.len())
            .field("entries", &self.entries.len())
            .field("limits", &self.limits)
            .field("stats", &self.stats)
            .finish()
    }
}

fn missing(owner: Identity, key: Identity) -> WrapError {
    WrapError::Store(format!("no entry {} under owner {}", key, owner))
}

fn check_type<T: Object>(entry: &Entry) -> Result<()> {
    let expected = T::type_name();
    if entry.type_name != expected {
        return Err(WrapError::type_mismatch(expected, &entry.type_name));
    }
    Ok(())
}

fn tag_disagrees(type_name: &TypeName) -> WrapError {
    WrapError::Store(format!(
        "stored value does not match its recorded type {}",
        type_name
    ))
}

impl IdentityStore for MemoryStore {
    fn new_identity(&mut self) -> Identity {
        let identity = Identity::from_raw(self.next_identity);
        self.next_identity += 1;
        self.live.insert(identity);
        self.stats.identities_minted += 1;
        identity
    }

    fn release(&mut self, identity: Identity) -> Result<()> {
        if !self.live.contains(&identity) {
            return Err(WrapError::Store(format!(
                "identity {} is not live in this store",
                identity
            )));
        }
        let owned = self.owned_count(identity);
        if owned > 0 {
            return Err(WrapError::Store(format!(
                "identity {} still owns {} entries",
                identity, owned
            )));
        }
        self.live.remove(&identity);
        self.owned.remove(&identity);
        self.stats.identities_released += 1;
        Ok(())
    }

    fn put<T: Object>(
        &mut self,
        owner: Identity,
        key: Identity,
        value: T,
    ) -> std::result::Result<(), Rejected<T>> {
        if self.entries.contains_key(&(owner, key)) {
            let error = WrapError::Store(format!(
                "entry {} under owner {} already exists",
                key, owner
            ));
            return Err(Rejected::new(value, error));
        }
        let type_name = T::type_name();
        trace!(%owner, %key, kind = %type_name, "store put");
        self.entries.insert(
            (owner, key),
            Entry {
                type_name,
                value: Box::new(value),
            },
        );
        *self.owned.entry(owner).or_insert(0) += 1;
        self.stats.puts += 1;
        Ok(())
    }

    fn get<T: Object>(&self, owner: Identity, key: Identity) -> Result<&T> {
        let entry = self.entry(owner, key)?;
        check_type::<T>(entry)?;
        entry
            .value
            .downcast_ref::<T>()
            .ok_or_else(|| tag_disagrees(&entry.type_name))
    }

    fn get_mut<T: Object>(&mut self, owner: Identity, key: Identity) -> Result<&mut T> {
        let entry = self.entry_mut(owner, key)?;
        check_type::<T>(entry)?;
        let type_name = entry.type_name.clone();
        entry
            .value
            .downcast_mut::<T>()
            .ok_or_else(|| tag_disagrees(&type_name))
    }

    fn delete<T: Object>(&mut self, owner: Identity, key: Identity) -> Result<T> {
        {
            let entry = self.entry(owner, key)?;
            check_type::<T>(entry)?;
            if !entry.value.is::<T>() {
                return Err(tag_disagrees(&entry.type_name));
            }
        }
        let entry = self
            .entries
            .remove(&(owner, key))
            .ok_or_else(|| missing(owner, key))?;
        if let Some(count) = self.owned.get_mut(&owner) {
            *count = count.saturating_sub(1);
        }
        self.stats.deletes += 1;
        trace!(%owner, %key, kind = %entry.type_name, "store delete");
        let type_name = entry.type_name;
        entry
            .value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| tag_disagrees(&type_name))
    }

    fn exists<T: Object>(&self, owner: Identity, key: Identity) -> bool {
        self.entries
            .get(&(owner, key))
            .map(|entry| entry.type_name == T::type_name() && entry.value.is::<T>())
            .unwrap_or(false)
    }

    fn contains(&self, owner: Identity, key: Identity) -> bool {
        self.entries.contains_key(&(owner, key))
    }

    fn owned_count(&self, owner: Identity) -> usize {
        self.owned.get(&owner).copied().unwrap_or(0)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn limits(&self) -> &Limits {
        &self.limits
    }
}
