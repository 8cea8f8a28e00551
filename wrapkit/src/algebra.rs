//! Set algebra over wrappers
//!
//! Merge, shift and the split family are built from [`Wrapper::add`] and
//! [`Wrapper::remove`], so they inherit swap-remove ordering. Each function
//! checks every precondition before it moves the first member or mints a new
//! identity.

use std::collections::HashSet;
use tracing::debug;
use wrapkit_store::IdentityStore;
use wrapkit_types::{Identity, Object, Rejected, Result, WrapError};

use crate::wrapper::Wrapper;

/// Combine two wrappers into one, consuming both.
///
/// - An empty operand is destroyed and the other one is returned.
/// - When both hold `T`, the smaller is shifted into the larger and destroyed.
///   `w1` receives only when it holds strictly more members, so on equal
///   counts the surviving identity is `w2`'s.
/// - Otherwise a new wrapper is created holding `w1` then `w2` as nested
///   members.
///
/// On failure both operands are handed back in their original positions.
pub fn merge<T: Object, S: IdentityStore>(
    store: &mut S,
    w1: Wrapper,
    w2: Wrapper,
) -> std::result::Result<Wrapper, Rejected<(Wrapper, Wrapper)>> {
    if w1.is_empty() {
        return match w1.destroy_empty(store) {
            Ok(()) => Ok(w2),
            Err(rejected) => Err(rejected.map(|w1| (w1, w2))),
        };
    }
    if w2.is_empty() {
        return match w2.destroy_empty(store) {
            Ok(()) => Ok(w1),
            Err(rejected) => Err(rejected.map(|w2| (w1, w2))),
        };
    }

    if w1.kind().matches::<T>() && w2.kind().matches::<T>() {
        let first_receives = w1.count() > w2.count();
        let (mut receiver, mut donor) = if first_receives { (w1, w2) } else { (w2, w1) };
        let restore = move |receiver: Wrapper, donor: Wrapper| {
            if first_receives {
                (receiver, donor)
            } else {
                (donor, receiver)
            }
        };

        if let Err(error) = shift::<T, S>(store, &mut donor, &mut receiver) {
            return Err(Rejected::new(restore(receiver, donor), error));
        }
        debug!(
            receiver = %receiver.identity(),
            donor = %donor.identity(),
            count = receiver.count(),
            "merged by shift"
        );
        return match donor.destroy_empty(store) {
            Ok(()) => Ok(receiver),
            Err(rejected) => {
                let (donor, error) = rejected.into_parts();
                Err(Rejected::new(restore(receiver, donor), error))
            }
        };
    }

    nest(store, w1, w2)
}

fn nest<S: IdentityStore>(
    store: &mut S,
    w1: Wrapper,
    w2: Wrapper,
) -> std::result::Result<Wrapper, Rejected<(Wrapper, Wrapper)>> {
    if let Err(error) = store.limits().check_members(0, 2) {
        return Err(Rejected::new((w1, w2), error));
    }

    let mut outer = Wrapper::new(store);
    if let Err(rejected) = outer.add(store, w1) {
        let (w1, error) = rejected.into_parts();
        // Best effort: the fresh wrapper is empty here.
        let _ = outer.destroy_empty(store);
        return Err(Rejected::new((w1, w2), error));
    }
    if let Err(rejected) = outer.add(store, w2) {
        let (w2, error) = rejected.into_parts();
        return match outer.remove::<Wrapper, S>(store, 0) {
            Ok(w1) => {
                let _ = outer.destroy_empty(store);
                Err(Rejected::new((w1, w2), error))
            }
            // w1 stays inside `outer`; surface the outer wrapper's store error.
            Err(recover) => Err(Rejected::new((outer, w2), recover)),
        };
    }
    debug!(outer = %outer.identity(), "merged by nesting");
    Ok(outer)
}

/// Move every member of `source` into `dest`.
///
/// Members arrive in drain order (`[a, b, c, d]` lands as `a, d, c, b`).
/// `source` is left empty but alive. Shifting from an empty wrapper is a
/// no-op for any `T`.
pub fn shift<T: Object, S: IdentityStore>(
    store: &mut S,
    source: &mut Wrapper,
    dest: &mut Wrapper,
) -> Result<()> {
    if source.is_empty() {
        return Ok(());
    }
    source.ensure_members::<T, S>(store)?;
    dest.kind().admits::<T>()?;
    let dest_id = dest.identity();
    if let Some(id) = source
        .items()
        .iter()
        .find(|id| **id == dest_id || dest.contains(**id))
    {
        return Err(WrapError::DuplicateMember(*id));
    }
    store.limits().check_members(dest.count(), source.count())?;
    if let Some(id) = source.items().iter().find(|id| store.contains(dest_id, **id)) {
        return Err(WrapError::Store(format!(
            "orphaned entry {} under wrapper {}",
            id, dest_id
        )));
    }

    let moved = source.count();
    for item in source.take_all::<T, S>(store)? {
        dest.add(store, item)?;
    }
    debug!(source = %source.identity(), dest = %dest.identity(), moved, "shifted");
    Ok(())
}

/// Move `count` members of `source` into a new wrapper.
///
/// When `source` holds no more than `count`, everything moves. Otherwise
/// index 0 is removed `count` times, so the result depends on physical order.
pub fn split<T: Object, S: IdentityStore>(
    store: &mut S,
    source: &mut Wrapper,
    count: usize,
) -> Result<Wrapper> {
    if !source.is_empty() {
        source.ensure_members::<T, S>(store)?;
    }

    let mut split = Wrapper::new(store);
    if source.count() <= count {
        shift::<T, S>(store, source, &mut split)?;
    } else {
        for _ in 0..count {
            let item = source.remove::<T, S>(store, 0)?;
            split.add(store, item)?;
        }
    }
    debug!(source = %source.identity(), split = %split.identity(), count = split.count(), "split");
    Ok(split)
}

/// Move the members at `indices` into a new wrapper.
///
/// Every index is resolved against `source` as it is before the call, so
/// swap-remove cannot shift later indices. The result holds the members in
/// the order the indices were given.
pub fn split_with_index<T: Object, S: IdentityStore>(
    store: &mut S,
    source: &mut Wrapper,
    mut indices: Vec<usize>,
) -> Result<Wrapper> {
    let mut ids = Vec::with_capacity(indices.len());
    while let Some(index) = indices.pop() {
        ids.push(source.item(index)?);
    }
    split_with_id::<T, S>(store, source, ids)
}

/// Move the members with identities `ids` into a new wrapper.
///
/// Ids are consumed from the end of the list, so the result holds them in
/// reverse input order. Every id must name a distinct member stored as a
/// `T`; otherwise nothing moves and the first offending id is reported as
/// `NotFoundOrTypeMismatch`.
pub fn split_with_id<T: Object, S: IdentityStore>(
    store: &mut S,
    source: &mut Wrapper,
    mut ids: Vec<Identity>,
) -> Result<Wrapper> {
    let mut seen = HashSet::with_capacity(ids.len());
    for &id in ids.iter().rev() {
        if !seen.insert(id) || !source.has_item_with_type::<T, S>(store, id) {
            return Err(WrapError::NotFoundOrTypeMismatch(id));
        }
    }

    let mut split = Wrapper::new(store);
    while let Some(id) = ids.pop() {
        let item = source.take::<T, S>(store, id)?;
        split.add(store, item)?;
    }
    debug!(source = %source.identity(), split = %split.identity(), count = split.count(), "split by id");
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapkit_store::MemoryStore;
    use wrapkit_test_utils::{mint_badges, mint_tickets, sorted, Badge, Counterfeit, Ticket};
    use wrapkit_types::Limits;

    fn tickets(store: &mut MemoryStore, payloads: &[u64]) -> Wrapper {
        let items = mint_tickets(store, payloads);
        Wrapper::wrap(store, items).unwrap()
    }

    fn badges(store: &mut MemoryStore, payloads: &[u64]) -> Wrapper {
        let items = mint_badges(store, payloads);
        Wrapper::wrap(store, items).unwrap()
    }

    fn physical(store: &MemoryStore, wrapper: &Wrapper) -> Vec<u64> {
        (0..wrapper.count())
            .map(|idx| wrapper.borrow::<Ticket, _>(store, idx).unwrap().payload)
            .collect()
    }

    #[test]
    fn test_merge_empty_first_returns_second() {
        let mut store = MemoryStore::new();
        let empty = Wrapper::new(&mut store);
        let empty_id = empty.identity();
        let full = tickets(&mut store, &[1, 2]);
        let full_id = full.identity();

        let merged = merge::<Ticket, _>(&mut store, empty, full).unwrap();
        assert_eq!(merged.identity(), full_id);
        assert!(!store.is_live(empty_id));
    }

    #[test]
    fn test_merge_empty_second_returns_first() {
        let mut store = MemoryStore::new();
        let full = tickets(&mut store, &[1]);
        let full_id = full.identity();
        let empty = Wrapper::new(&mut store);

        // T is irrelevant when an operand is empty.
        let merged = merge::<Badge, _>(&mut store, full, empty).unwrap();
        assert_eq!(merged.identity(), full_id);
        assert_eq!(merged.count(), 1);
    }

    #[test]
    fn test_merge_larger_first_receives() {
        let mut store = MemoryStore::new();
        let w1 = tickets(&mut store, &[1, 2, 3]);
        let w2 = tickets(&mut store, &[4, 5]);
        let (w1_id, w2_id) = (w1.identity(), w2.identity());

        let merged = merge::<Ticket, _>(&mut store, w1, w2).unwrap();
        assert_eq!(merged.identity(), w1_id);
        assert_eq!(physical(&store, &merged), vec![1, 2, 3, 4, 5]);
        assert!(!store.is_live(w2_id));
    }

    #[test]
    fn test_merge_tie_prefers_second() {
        let mut store = MemoryStore::new();
        let w1 = tickets(&mut store, &[1, 2, 3]);
        let w2 = tickets(&mut store, &[4, 5, 6]);
        let (w1_id, w2_id) = (w1.identity(), w2.identity());

        let merged = merge::<Ticket, _>(&mut store, w1, w2).unwrap();
        assert_eq!(merged.identity(), w2_id);
        assert_eq!(physical(&store, &merged), vec![4, 5, 6, 1, 3, 2]);
        assert!(!store.is_live(w1_id));
    }

    #[test]
    fn test_merge_different_kinds_nests() {
        let mut store = MemoryStore::new();
        let w1 = tickets(&mut store, &[1]);
        let w2 = badges(&mut store, &[2]);
        let (w1_id, w2_id) = (w1.identity(), w2.identity());

        let merged = merge::<Ticket, _>(&mut store, w1, w2).unwrap();
        assert!(merged.kind().is_nested());
        assert_eq!(merged.items(), &[w1_id, w2_id]);
        let inner = merged.borrow::<Wrapper, _>(&store, 1).unwrap();
        assert!(inner.kind().matches::<Badge>());
    }

    #[test]
    fn test_merge_same_kind_other_than_requested_nests() {
        let mut store = MemoryStore::new();
        let w1 = badges(&mut store, &[1]);
        let w2 = badges(&mut store, &[2]);
        let merged = merge::<Ticket, _>(&mut store, w1, w2).unwrap();
        assert!(merged.kind().is_nested());
        assert_eq!(merged.count(), 2);
    }

    #[test]
    fn test_merge_failure_returns_operands_in_place() {
        let mut store = MemoryStore::with_limits(Limits {
            max_members: 4,
            ..Limits::default()
        });
        let w1 = tickets(&mut store, &[1, 2, 3]);
        let w2 = tickets(&mut store, &[4, 5]);
        let (w1_id, w2_id) = (w1.identity(), w2.identity());
        let minted = store.stats().identities_minted;

        let rejected = merge::<Ticket, _>(&mut store, w1, w2).unwrap_err();
        assert!(matches!(rejected.error(), WrapError::LimitExceeded(_)));
        let (w1, w2) = rejected.into_value();
        assert_eq!((w1.identity(), w1.count()), (w1_id, 3));
        assert_eq!((w2.identity(), w2.count()), (w2_id, 2));
        assert_eq!(physical(&store, &w1), vec![1, 2, 3]);
        assert_eq!(store.stats().identities_minted, minted);
    }

    #[test]
    fn test_shift_moves_in_drain_order() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2, 3, 4]);
        let mut dest = tickets(&mut store, &[9]);

        shift::<Ticket, _>(&mut store, &mut source, &mut dest).unwrap();
        assert!(source.is_empty());
        assert!(source.kind().is_empty());
        assert!(store.is_live(source.identity()));
        assert_eq!(physical(&store, &dest), vec![9, 1, 4, 3, 2]);
    }

    #[test]
    fn test_shift_into_other_kind_fails_untouched() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2]);
        let mut dest = badges(&mut store, &[3]);

        assert!(matches!(
            shift::<Ticket, _>(&mut store, &mut source, &mut dest),
            Err(WrapError::TypeMismatch { .. })
        ));
        assert_eq!(physical(&store, &source), vec![1, 2]);
        assert_eq!(dest.count(), 1);
    }

    #[test]
    fn test_shift_onto_orphaned_entry_fails_untouched() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2, 3]);
        let mut dest = tickets(&mut store, &[9]);
        let clash = source.item(2).unwrap();
        let stray = Ticket {
            id: clash,
            payload: 99,
        };
        store.put(dest.identity(), clash, stray).unwrap();
        let entries_before = store.len();

        assert!(matches!(
            shift::<Ticket, _>(&mut store, &mut source, &mut dest),
            Err(WrapError::Store(_))
        ));
        assert_eq!(physical(&store, &source), vec![1, 2, 3]);
        assert_eq!(physical(&store, &dest), vec![9]);
        assert_eq!(store.len(), entries_before);
    }

    #[test]
    fn test_shift_with_foreign_member_fails_untouched() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2]);
        let fake = Counterfeit::mint(&mut store, 3);
        source.add(&mut store, fake).unwrap();
        let mut dest = Wrapper::new(&mut store);
        let entries_before = store.len();

        assert!(matches!(
            shift::<Ticket, _>(&mut store, &mut source, &mut dest),
            Err(WrapError::Store(_))
        ));
        assert_eq!(source.count(), 3);
        assert!(dest.is_empty());
        assert_eq!(store.len(), entries_before);
    }

    #[test]
    fn test_shift_from_empty_is_noop() {
        let mut store = MemoryStore::new();
        let mut source = Wrapper::new(&mut store);
        let mut dest = badges(&mut store, &[3]);
        shift::<Ticket, _>(&mut store, &mut source, &mut dest).unwrap();
        assert_eq!(dest.count(), 1);
    }

    #[test]
    fn test_split_takes_from_front() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2, 3, 4, 5]);
        let part = split::<Ticket, _>(&mut store, &mut source, 2).unwrap();
        assert_eq!(physical(&store, &part), vec![1, 5]);
        assert_eq!(physical(&store, &source), vec![4, 2, 3]);
    }

    #[test]
    fn test_split_everything_when_count_exceeds() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2, 3]);
        let part = split::<Ticket, _>(&mut store, &mut source, 10).unwrap();
        assert!(source.is_empty());
        assert_eq!(sorted(physical(&store, &part)), vec![1, 2, 3]);
    }

    #[test]
    fn test_split_zero_gives_empty_wrapper() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2]);
        let part = split::<Ticket, _>(&mut store, &mut source, 0).unwrap();
        assert!(part.is_empty());
        assert_eq!(source.count(), 2);
    }

    #[test]
    fn test_split_wrong_type_mints_nothing() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2]);
        let minted = store.stats().identities_minted;
        assert!(split::<Badge, _>(&mut store, &mut source, 1).is_err());
        assert_eq!(store.stats().identities_minted, minted);
    }

    #[test]
    fn test_split_with_foreign_member_mints_nothing() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2, 3]);
        let fake = Counterfeit::mint(&mut store, 4);
        source.add(&mut store, fake).unwrap();
        let minted = store.stats().identities_minted;
        let entries_before = store.len();

        for count in [2, 10] {
            assert!(matches!(
                split::<Ticket, _>(&mut store, &mut source, count),
                Err(WrapError::Store(_))
            ));
        }
        assert_eq!(source.count(), 4);
        assert_eq!(store.len(), entries_before);
        assert_eq!(store.stats().identities_minted, minted);
    }

    #[test]
    fn test_split_with_id_foreign_member_mints_nothing() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1]);
        let fake = Counterfeit::mint(&mut store, 2);
        let fake_id = fake.id;
        source.add(&mut store, fake).unwrap();
        let ids = vec![fake_id, source.item(0).unwrap()];
        let minted = store.stats().identities_minted;

        assert_eq!(
            split_with_id::<Ticket, _>(&mut store, &mut source, ids).unwrap_err(),
            WrapError::NotFoundOrTypeMismatch(fake_id)
        );
        assert_eq!(source.count(), 2);
        assert_eq!(store.stats().identities_minted, minted);
    }

    #[test]
    fn test_split_with_index_keeps_given_order() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2, 3, 4]);
        let part = split_with_index::<Ticket, _>(&mut store, &mut source, vec![0, 2]).unwrap();
        assert_eq!(physical(&store, &part), vec![1, 3]);
        assert_eq!(sorted(physical(&store, &source)), vec![2, 4]);
    }

    #[test]
    fn test_split_with_index_out_of_bounds_untouched() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2]);
        assert_eq!(
            split_with_index::<Ticket, _>(&mut store, &mut source, vec![0, 7]).unwrap_err(),
            WrapError::IndexOutOfBounds { index: 7, count: 2 }
        );
        assert_eq!(physical(&store, &source), vec![1, 2]);
    }

    #[test]
    fn test_split_with_index_repeated_index_fails() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2]);
        let id = source.item(1).unwrap();
        assert_eq!(
            split_with_index::<Ticket, _>(&mut store, &mut source, vec![1, 1]).unwrap_err(),
            WrapError::NotFoundOrTypeMismatch(id)
        );
        assert_eq!(source.count(), 2);
    }

    #[test]
    fn test_split_with_id_reverses_input() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2, 3]);
        let ids = vec![source.item(0).unwrap(), source.item(2).unwrap()];
        let part = split_with_id::<Ticket, _>(&mut store, &mut source, ids).unwrap();
        assert_eq!(physical(&store, &part), vec![3, 1]);
        assert_eq!(physical(&store, &source), vec![2]);
    }

    #[test]
    fn test_split_with_id_unknown_id_untouched() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1, 2]);
        let stranger = Ticket::mint(&mut store, 3).id;
        let ids = vec![source.item(0).unwrap(), stranger];
        assert_eq!(
            split_with_id::<Ticket, _>(&mut store, &mut source, ids).unwrap_err(),
            WrapError::NotFoundOrTypeMismatch(stranger)
        );
        assert_eq!(physical(&store, &source), vec![1, 2]);
    }

    #[test]
    fn test_split_with_id_wrong_type() {
        let mut store = MemoryStore::new();
        let mut source = tickets(&mut store, &[1]);
        let id = source.item(0).unwrap();
        assert_eq!(
            split_with_id::<Badge, _>(&mut store, &mut source, vec![id]).unwrap_err(),
            WrapError::NotFoundOrTypeMismatch(id)
        );
    }
}
