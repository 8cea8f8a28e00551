//! Fixture objects

use crate::Payload;
use wrapkit_store::IdentityStore;
use wrapkit_types::{Identity, Object, TypeName, Typed};

/// A plain storable object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Identity minted by the store
    pub id: Identity,
    /// Test payload
    pub payload: u64,
}

impl Ticket {
    /// Mint a ticket with a fresh identity
    pub fn mint<S: IdentityStore>(store: &mut S, payload: u64) -> Self {
        Self {
            id: store.new_identity(),
            payload,
        }
    }
}

impl Typed for Ticket {
    fn type_name() -> TypeName {
        TypeName::new("wrapkit_test_utils::fixtures", "Ticket")
    }
}

impl Object for Ticket {
    fn id(&self) -> Identity {
        self.id
    }
}

impl Payload for Ticket {
    fn payload(&self) -> u64 {
        self.payload
    }
}

/// Same shape as `Ticket`, different declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Identity minted by the store
    pub id: Identity,
    /// Test payload
    pub payload: u64,
}

impl Badge {
    /// Mint a badge with a fresh identity
    pub fn mint<S: IdentityStore>(store: &mut S, payload: u64) -> Self {
        Self {
            id: store.new_identity(),
            payload,
        }
    }
}

impl Typed for Badge {
    fn type_name() -> TypeName {
        TypeName::new("wrapkit_test_utils::fixtures", "Badge")
    }
}

impl Object for Badge {
    fn id(&self) -> Identity {
        self.id
    }
}

impl Payload for Badge {
    fn payload(&self) -> u64 {
        self.payload
    }
}

/// Declares `Ticket`'s canonical name without being a `Ticket`.
///
/// A wrapper of tickets accepts it on name alone; the store can still tell
/// the two apart, which lets tests drive the paths where a recorded kind and
/// a stored value disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterfeit {
    /// Identity minted by the store
    pub id: Identity,
    /// Test payload
    pub payload: u64,
}

impl Counterfeit {
    /// Mint a counterfeit with a fresh identity
    pub fn mint<S: IdentityStore>(store: &mut S, payload: u64) -> Self {
        Self {
            id: store.new_identity(),
            payload,
        }
    }
}

impl Typed for Counterfeit {
    fn type_name() -> TypeName {
        Ticket::type_name()
    }
}

impl Object for Counterfeit {
    fn id(&self) -> Identity {
        self.id
    }
}

/// Generic fixture; `Boxed<u64>` and `Boxed<u8>` are different kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boxed<T> {
    /// Identity minted by the store
    pub id: Identity,
    /// Wrapped value
    pub value: T,
}

impl<T> Boxed<T> {
    /// Mint a boxed value with a fresh identity
    pub fn mint<S: IdentityStore>(store: &mut S, value: T) -> Self {
        Self {
            id: store.new_identity(),
            value,
        }
    }
}

impl<T: Typed> Typed for Boxed<T> {
    fn type_name() -> TypeName {
        TypeName::new("wrapkit_test_utils::fixtures", "Boxed").with_param(T::type_name())
    }
}

impl<T: Typed + Send + 'static> Object for Boxed<T> {
    fn id(&self) -> Identity {
        self.id
    }
}

impl<T: Copy + Into<u64>> Payload for Boxed<T> {
    fn payload(&self) -> u64 {
        self.value.into()
    }
}
