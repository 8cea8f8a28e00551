//! Identity store abstraction

use wrapkit_types::{Identity, Limits, Object, Rejected, Result};

/// Host-provided keyed storage for owned objects.
///
/// Entries are addressed by the identity of their owner plus a key identity.
/// Every entry remembers the canonical type it was stored as; typed accessors
/// fail with `TypeMismatch` when asked for another type.
pub trait IdentityStore {
    /// Mint a fresh identity that has never been handed out by this store.
    fn new_identity(&mut self) -> Identity;

    /// Retire an identity minted by [`new_identity`](Self::new_identity).
    ///
    /// Fails if the identity is unknown or still owns entries.
    fn release(&mut self, identity: Identity) -> Result<()>;

    /// Store `value` under `(owner, key)`.
    ///
    /// Fails if the slot is occupied, handing `value` back.
    fn put<T: Object>(
        &mut self,
        owner: Identity,
        key: Identity,
        value: T,
    ) -> std::result::Result<(), Rejected<T>>;

    /// Borrow the entry under `(owner, key)` as a `T`.
    fn get<T: Object>(&self, owner: Identity, key: Identity) -> Result<&T>;

    /// Mutably borrow the entry under `(owner, key)` as a `T`.
    fn get_mut<T: Object>(&mut self, owner: Identity, key: Identity) -> Result<&mut T>;

    /// Remove and return the entry under `(owner, key)` as a `T`.
    ///
    /// On a type mismatch the entry stays in place.
    fn delete<T: Object>(&mut self, owner: Identity, key: Identity) -> Result<T>;

    /// True when `(owner, key)` holds an entry stored as a `T`.
    fn exists<T: Object>(&self, owner: Identity, key: Identity) -> bool;

    /// True when `(owner, key)` holds an entry of any type.
    fn contains(&self, owner: Identity, key: Identity) -> bool;

    /// Number of entries owned by `owner`.
    fn owned_count(&self, owner: Identity) -> usize;

    /// Total number of live entries.
    fn len(&self) -> usize;

    /// True when no entries are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Limits the host imposes on wrappers built over this store.
    fn limits(&self) -> &Limits;
}
