//! The type-homogeneous wrapper
//!
//! A [`Wrapper`] aggregates any number of objects of one concrete type under a
//! single identity. Members are not held inline: each one is stored in an
//! [`IdentityStore`] under `(wrapper identity, member identity)` and the
//! wrapper keeps the ordered list of member identities.
//!
//! # Index stability
//!
//! Removal uses swap-remove: the last member moves into the vacated slot. An
//! index is only meaningful until the next mutating call. Removing index 0
//! repeatedly therefore yields the first member followed by the remaining
//! ones from last to second (`[a, b, c, d]` drains as `a, d, c, b`).
//!
//! # Failure atomicity
//!
//! Every operation validates all of its preconditions before the first
//! mutation. An operation that returns an error has changed neither the
//! wrapper nor the store, and operations that consume a value hand it back
//! inside [`Rejected`].

use tracing::debug;
use wrapkit_store::IdentityStore;
use wrapkit_types::constants::{WRAPPER_MODULE, WRAPPER_TYPE};
use wrapkit_types::{Identity, Kind, Object, Rejected, Result, TypeName, Typed, WrapError};

/// A type-homogeneous aggregate of stored objects
#[derive(Debug, PartialEq, Eq)]
pub struct Wrapper {
    identity: Identity,
    kind: Kind,
    alias: String,
    members: Vec<Identity>,
}

impl Wrapper {
    /// Create an empty wrapper with a fresh identity
    pub fn new<S: IdentityStore>(store: &mut S) -> Self {
        let identity = store.new_identity();
        debug!(%identity, "wrapper created");
        Self {
            identity,
            kind: Kind::Empty,
            alias: String::new(),
            members: Vec::new(),
        }
    }

    /// Create a wrapper holding `objects` in input order.
    ///
    /// All objects are validated before any is stored; on failure every
    /// object is handed back and no identity is minted.
    pub fn wrap<T: Object, S: IdentityStore>(
        store: &mut S,
        objects: Vec<T>,
    ) -> std::result::Result<Self, Rejected<Vec<T>>> {
        if let Err(error) = store.limits().check_members(0, objects.len()) {
            return Err(Rejected::new(objects, error));
        }
        for (idx, object) in objects.iter().enumerate() {
            let id = object.id();
            if objects[..idx].iter().any(|earlier| earlier.id() == id) {
                return Err(Rejected::new(objects, WrapError::DuplicateMember(id)));
            }
        }

        let mut wrapper = Self::new(store);
        let mut objects = objects.into_iter();
        for object in objects.by_ref() {
            if let Err(rejected) = wrapper.add(store, object) {
                // Unreachable against a conforming store: hand everything back.
                let (object, error) = rejected.into_parts();
                let mut returned = match wrapper.take_all::<T, S>(store) {
                    Ok(returned) => returned,
                    Err(_) => Vec::new(),
                };
                returned.push(object);
                returned.extend(objects);
                return Err(Rejected::new(returned, error));
            }
        }
        Ok(wrapper)
    }

    /// Identity of this wrapper
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Recorded kind of the members
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Display label
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Replace the display label
    pub fn set_alias<S: IdentityStore>(&mut self, store: &S, alias: impl Into<String>) -> Result<()> {
        let alias = alias.into();
        let max = store.limits().max_alias_bytes;
        if alias.len() > max {
            return Err(WrapError::LimitExceeded(format!(
                "alias of {} bytes exceeds max_alias_bytes {}",
                alias.len(),
                max
            )));
        }
        self.alias = alias;
        Ok(())
    }

    /// Number of members
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// True when the wrapper holds nothing
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when both wrappers record the same kind (two empty wrappers match)
    pub fn is_same_kind(&self, other: &Wrapper) -> bool {
        self.kind == other.kind
    }

    /// Member identities in physical order
    pub fn items(&self) -> &[Identity] {
        &self.members
    }

    /// Identity of the member at `index`
    pub fn item(&self, index: usize) -> Result<Identity> {
        self.check_index(index)?;
        Ok(self.members[index])
    }

    /// True when `id` is a member, regardless of type
    pub fn contains(&self, id: Identity) -> bool {
        self.position(id).is_some()
    }

    /// True when `id` is a member stored as a `T`
    pub fn has_item_with_type<T: Object, S: IdentityStore>(&self, store: &S, id: Identity) -> bool {
        self.contains(id) && store.exists::<T>(self.identity, id)
    }

    /// Borrow the member at `index`
    pub fn borrow<'s, T: Object, S: IdentityStore>(
        &self,
        store: &'s S,
        index: usize,
    ) -> Result<&'s T> {
        self.check_index(index)?;
        self.kind.ensure::<T>()?;
        store.get::<T>(self.identity, self.members[index])
    }

    /// Mutably borrow the member at `index`.
    ///
    /// The member stays keyed by the identity it was added under. Replacing
    /// the whole value, or otherwise changing what [`Object::id`] reports,
    /// desynchronises the member from its key and later lookups by identity
    /// will not find it.
    pub fn borrow_mut<'s, T: Object, S: IdentityStore>(
        &self,
        store: &'s mut S,
        index: usize,
    ) -> Result<&'s mut T> {
        self.check_index(index)?;
        self.kind.ensure::<T>()?;
        store.get_mut::<T>(self.identity, self.members[index])
    }

    /// Add `object` as the last member.
    ///
    /// The first add into an empty wrapper establishes its kind; later adds
    /// must be of exactly that type.
    pub fn add<T: Object, S: IdentityStore>(
        &mut self,
        store: &mut S,
        object: T,
    ) -> std::result::Result<(), Rejected<T>> {
        let id = object.id();
        if let Err(error) = self.admit::<T, S>(store, id) {
            return Err(Rejected::new(object, error));
        }
        store.put(self.identity, id, object)?;
        if self.kind.is_empty() {
            self.kind = Kind::of::<T>();
        }
        self.members.push(id);
        debug!(wrapper = %self.identity, member = %id, kind = %self.kind, count = self.members.len(), "member added");
        Ok(())
    }

    /// Remove and return the member at `index` (swap-remove).
    pub fn remove<T: Object, S: IdentityStore>(&mut self, store: &mut S, index: usize) -> Result<T> {
        self.check_index(index)?;
        self.kind.ensure::<T>()?;
        let id = self.members[index];
        let object = store.delete::<T>(self.identity, id)?;
        self.members.swap_remove(index);
        if self.members.is_empty() {
            self.kind = Kind::Empty;
        }
        debug!(wrapper = %self.identity, member = %id, index, count = self.members.len(), "member removed");
        Ok(object)
    }

    /// Remove and return the member with identity `id`
    pub fn take<T: Object, S: IdentityStore>(&mut self, store: &mut S, id: Identity) -> Result<T> {
        let index = self
            .position(id)
            .filter(|_| store.exists::<T>(self.identity, id))
            .ok_or(WrapError::NotFound(id))?;
        self.remove(store, index)
    }

    /// Remove every member by repeatedly removing index 0.
    ///
    /// Items come back in removal order, which for physical order
    /// `[a, b, c, d]` is `[a, d, c, b]`.
    pub fn take_all<T: Object, S: IdentityStore>(&mut self, store: &mut S) -> Result<Vec<T>> {
        if self.members.is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_members::<T, S>(store)?;
        let mut items = Vec::with_capacity(self.members.len());
        while !self.members.is_empty() {
            items.push(self.remove::<T, S>(store, 0)?);
        }
        Ok(items)
    }

    /// Drain every member and destroy the wrapper
    pub fn unwrap<T: Object, S: IdentityStore>(
        mut self,
        store: &mut S,
    ) -> std::result::Result<Vec<T>, Rejected<Wrapper>> {
        if !self.members.is_empty() {
            if let Err(error) = self.kind.ensure::<T>() {
                return Err(Rejected::new(self, error));
            }
        }
        let items = match self.take_all::<T, S>(store) {
            Ok(items) => items,
            Err(error) => return Err(Rejected::new(self, error)),
        };
        self.destroy_empty(store)?;
        Ok(items)
    }

    /// Destroy an empty wrapper, releasing its identity.
    ///
    /// A non-empty wrapper is handed back intact with `NotEmpty`.
    pub fn destroy_empty<S: IdentityStore>(
        self,
        store: &mut S,
    ) -> std::result::Result<(), Rejected<Wrapper>> {
        if !self.members.is_empty() {
            let count = self.members.len();
            return Err(Rejected::new(self, WrapError::NotEmpty { count }));
        }
        if let Err(error) = store.release(self.identity) {
            return Err(Rejected::new(self, error));
        }
        debug!(wrapper = %self.identity, "wrapper destroyed");
        Ok(())
    }

    /// Require every member to be stored as a `T`, not just recorded as one.
    pub(crate) fn ensure_members<T: Object, S: IdentityStore>(&self, store: &S) -> Result<()> {
        self.kind.ensure::<T>()?;
        match self
            .members
            .iter()
            .find(|id| !store.exists::<T>(self.identity, **id))
        {
            Some(id) => Err(WrapError::Store(format!(
                "member {} under wrapper {} is not stored as {}",
                id,
                self.identity,
                T::type_name()
            ))),
            None => Ok(()),
        }
    }

    fn admit<T: Object, S: IdentityStore>(&self, store: &S, id: Identity) -> Result<()> {
        self.kind.admits::<T>()?;
        if id == self.identity || self.contains(id) {
            return Err(WrapError::DuplicateMember(id));
        }
        store.limits().check_members(self.members.len(), 1)?;
        if store.contains(self.identity, id) {
            return Err(WrapError::Store(format!(
                "orphaned entry {} under wrapper {}",
                id, self.identity
            )));
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.members.len() {
            return Err(WrapError::IndexOutOfBounds {
                index,
                count: self.members.len(),
            });
        }
        Ok(())
    }

    fn position(&self, id: Identity) -> Option<usize> {
        self.members.iter().position(|member| *member == id)
    }
}

impl Typed for Wrapper {
    fn type_name() -> TypeName {
        TypeName::new(WRAPPER_MODULE, WRAPPER_TYPE)
    }
}

impl Object for Wrapper {
    fn id(&self) -> Identity {
        self.identity
    }
}
