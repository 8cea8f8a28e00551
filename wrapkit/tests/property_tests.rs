//! Property-based tests for wrapper invariants

mod common;

use common::{physical, ticket_wrapper};
use proptest::prelude::*;
use wrapkit::{merge, shift, split, split_with_index, IdentityStore, MemoryStore, Wrapper};
use wrapkit_test_utils::{mint_tickets, sorted, Badge, Ticket};

fn payloads() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(any::<u64>(), 0..64)
}

proptest! {
    #[test]
    fn count_and_kind_follow_adds(values in payloads()) {
        let mut store = MemoryStore::new();
        let mut wrapper = Wrapper::new(&mut store);
        for ticket in mint_tickets(&mut store, &values) {
            wrapper.add(&mut store, ticket).unwrap();
        }
        prop_assert_eq!(wrapper.count(), values.len());
        prop_assert_eq!(wrapper.is_empty(), values.is_empty());
        prop_assert_eq!(wrapper.kind().is_empty(), values.is_empty());
        if !values.is_empty() {
            prop_assert!(wrapper.kind().matches::<Ticket>());
        }
        prop_assert_eq!(physical::<Ticket, _>(&store, &wrapper), values);
    }

    #[test]
    fn mismatched_add_never_changes_state(values in prop::collection::vec(any::<u64>(), 1..32)) {
        let mut store = MemoryStore::new();
        let mut wrapper = ticket_wrapper(&mut store, &values);
        let items = wrapper.items().to_vec();
        let entries = store.len();

        let badge = Badge::mint(&mut store, 0);
        prop_assert!(wrapper.add(&mut store, badge).is_err());
        prop_assert_eq!(wrapper.items(), items.as_slice());
        prop_assert_eq!(store.len(), entries);
        prop_assert!(wrapper.kind().matches::<Ticket>());
    }

    #[test]
    fn remove_preserves_remaining_multiset(
        values in prop::collection::vec(any::<u64>(), 1..32),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut store = MemoryStore::new();
        let mut wrapper = ticket_wrapper(&mut store, &values);
        let index = pick.index(values.len());

        let removed: Ticket = wrapper.remove(&mut store, index).unwrap();
        prop_assert_eq!(removed.payload, values[index]);
        prop_assert_eq!(wrapper.is_empty(), values.len() == 1);

        let mut expected = values.clone();
        expected.swap_remove(index);
        prop_assert_eq!(physical::<Ticket, _>(&store, &wrapper), expected);
    }

    #[test]
    fn split_and_shift_back_conserves_mass(values in payloads(), count in 0usize..80) {
        let mut store = MemoryStore::new();
        let mut source = ticket_wrapper(&mut store, &values);

        let mut part = split::<Ticket, _>(&mut store, &mut source, count).unwrap();
        prop_assert_eq!(part.count(), count.min(values.len()));
        prop_assert_eq!(part.count() + source.count(), values.len());

        shift::<Ticket, _>(&mut store, &mut part, &mut source).unwrap();
        prop_assert_eq!(source.count(), values.len());
        prop_assert_eq!(sorted(physical::<Ticket, _>(&store, &source)), sorted(values));
    }

    #[test]
    fn merge_holds_union(left in payloads(), right in payloads()) {
        let mut store = MemoryStore::new();
        let w1 = ticket_wrapper(&mut store, &left);
        let w2 = ticket_wrapper(&mut store, &right);
        let (w1_id, w2_id) = (w1.identity(), w2.identity());

        let merged = merge::<Ticket, _>(&mut store, w1, w2).unwrap();
        let mut expected = left.clone();
        expected.extend_from_slice(&right);
        prop_assert_eq!(sorted(physical::<Ticket, _>(&store, &merged)), sorted(expected));

        let survivor = if left.is_empty() {
            w2_id
        } else if right.is_empty() || left.len() > right.len() {
            w1_id
        } else {
            w2_id
        };
        prop_assert_eq!(merged.identity(), survivor);
        prop_assert_eq!(store.stats().identities_released, 1);
    }

    #[test]
    fn split_with_index_takes_exactly_the_chosen_members(
        values in prop::collection::vec(any::<u64>(), 1..32),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let mut store = MemoryStore::new();
        let mut source = ticket_wrapper(&mut store, &values);

        let mut indices: Vec<usize> = picks.iter().map(|p| p.index(values.len())).collect();
        indices.sort_unstable();
        indices.dedup();
        let chosen: Vec<u64> = indices.iter().map(|&i| values[i]).collect();

        let part = split_with_index::<Ticket, _>(&mut store, &mut source, indices).unwrap();
        prop_assert_eq!(physical::<Ticket, _>(&store, &part), chosen);
        prop_assert_eq!(part.count() + source.count(), values.len());
    }
}
