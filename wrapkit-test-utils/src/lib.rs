//! wrapkit Test Utilities
//!
//! This crate provides fixture objects and minting helpers shared by the
//! wrapkit test suites. Fixtures carry a `payload` so tests can assert which
//! object ended up where without comparing identities.

use wrapkit_store::IdentityStore;

pub mod fixtures;

pub use fixtures::{Badge, Boxed, Counterfeit, Ticket};

/// Objects that expose a numeric payload for assertions
pub trait Payload {
    /// Payload carried by this fixture
    fn payload(&self) -> u64;
}

/// Mint one `Ticket` per payload, in order
pub fn mint_tickets<S: IdentityStore>(store: &mut S, payloads: &[u64]) -> Vec<Ticket> {
    payloads
        .iter()
        .map(|&payload| Ticket::mint(store, payload))
        .collect()
}

/// Mint one `Badge` per payload, in order
pub fn mint_badges<S: IdentityStore>(store: &mut S, payloads: &[u64]) -> Vec<Badge> {
    payloads
        .iter()
        .map(|&payload| Badge::mint(store, payload))
        .collect()
}

/// Payloads of a slice of fixtures, in slice order
pub fn payloads_of<T: Payload>(items: &[T]) -> Vec<u64> {
    items.iter().map(Payload::payload).collect()
}

/// Sort a payload list for multiset comparisons
pub fn sorted(mut payloads: Vec<u64>) -> Vec<u64> {
    payloads.sort_unstable();
    payloads
}
