//! Shared helpers for wrapkit integration tests

#![allow(dead_code)]

use wrapkit::{IdentityStore, MemoryStore, Object, Wrapper};
use wrapkit_test_utils::{mint_badges, mint_tickets, Payload};

/// Wrap one `Ticket` per payload
pub fn ticket_wrapper(store: &mut MemoryStore, payloads: &[u64]) -> Wrapper {
    let tickets = mint_tickets(store, payloads);
    Wrapper::wrap(store, tickets).unwrap()
}

/// Wrap one `Badge` per payload
pub fn badge_wrapper(store: &mut MemoryStore, payloads: &[u64]) -> Wrapper {
    let badges = mint_badges(store, payloads);
    Wrapper::wrap(store, badges).unwrap()
}

/// Payloads of every member in physical (index) order
pub fn physical<T, S>(store: &S, wrapper: &Wrapper) -> Vec<u64>
where
    T: Object + Payload,
    S: IdentityStore,
{
    (0..wrapper.count())
        .map(|idx| wrapper.borrow::<T, S>(store, idx).unwrap().payload())
        .collect()
}
