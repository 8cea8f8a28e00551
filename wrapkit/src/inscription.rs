//! Byte-payload wrapper
//!
//! An [`Inscription`] keeps raw byte payloads inline instead of store
//! identifiers. It shares the wrapper's removal semantics: swap-remove on
//! `remove` and the same drain order on `take_all`.

use bytes::Bytes;
use tracing::debug;
use wrapkit_store::IdentityStore;
use wrapkit_types::{Identity, Kind, Limits, Rejected, Result, WrapError};

/// A wrapper of inline byte payloads
#[derive(Debug, PartialEq, Eq)]
pub struct Inscription {
    identity: Identity,
    kind: Kind,
    alias: String,
    payloads: Vec<Bytes>,
    limits: Limits,
}

impl Inscription {
    /// Create an empty inscription, capturing the store's limits
    pub fn new<S: IdentityStore>(store: &mut S) -> Self {
        let identity = store.new_identity();
        debug!(%identity, "inscription created");
        Self {
            identity,
            kind: Kind::Empty,
            alias: String::new(),
            payloads: Vec::new(),
            limits: store.limits().clone(),
        }
    }

    /// Append a payload
    pub fn inscribe(&mut self, payload: impl Into<Bytes>) -> Result<()> {
        let payload = payload.into();
        if payload.len() > self.limits.max_inscription_bytes {
            return Err(WrapError::LimitExceeded(format!(
                "payload of {} bytes exceeds max_inscription_bytes {}",
                payload.len(),
                self.limits.max_inscription_bytes
            )));
        }
        self.limits.check_members(self.payloads.len(), 1)?;
        let len = payload.len();
        self.payloads.push(payload);
        self.kind = Kind::inscription();
        debug!(inscription = %self.identity, bytes = len, count = self.payloads.len(), "payload inscribed");
        Ok(())
    }

    /// Payload at `index`
    pub fn payload(&self, index: usize) -> Result<&Bytes> {
        self.payloads.get(index).ok_or(WrapError::IndexOutOfBounds {
            index,
            count: self.payloads.len(),
        })
    }

    /// Remove the payload at `index` (swap-remove)
    pub fn remove(&mut self, index: usize) -> Result<Bytes> {
        if index >= self.payloads.len() {
            return Err(WrapError::IndexOutOfBounds {
                index,
                count: self.payloads.len(),
            });
        }
        let payload = self.payloads.swap_remove(index);
        if self.payloads.is_empty() {
            self.kind = Kind::Empty;
        }
        debug!(inscription = %self.identity, index, count = self.payloads.len(), "payload removed");
        Ok(payload)
    }

    /// Remove every payload by repeatedly removing index 0
    pub fn take_all(&mut self) -> Vec<Bytes> {
        let mut payloads = Vec::with_capacity(self.payloads.len());
        while !self.payloads.is_empty() {
            payloads.push(self.payloads.swap_remove(0));
        }
        self.kind = Kind::Empty;
        payloads
    }

    /// Identity of this inscription
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// `Kind::inscription()` when non-empty, the sentinel otherwise
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Number of payloads
    pub fn count(&self) -> usize {
        self.payloads.len()
    }

    /// True when no payloads are held
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Display label
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Replace the display label
    pub fn set_alias(&mut self, alias: impl Into<String>) -> Result<()> {
        let alias = alias.into();
        if alias.len() > self.limits.max_alias_bytes {
            return Err(WrapError::LimitExceeded(format!(
                "alias of {} bytes exceeds max_alias_bytes {}",
                alias.len(),
                self.limits.max_alias_bytes
            )));
        }
        self.alias = alias;
        Ok(())
    }

    /// Destroy an empty inscription, releasing its identity
    pub fn destroy_empty<S: IdentityStore>(
        self,
        store: &mut S,
    ) -> std::result::Result<(), Rejected<Inscription>> {
        if !self.payloads.is_empty() {
            let count = self.payloads.len();
            return Err(Rejected::new(self, WrapError::NotEmpty { count }));
        }
        if let Err(error) = store.release(self.identity) {
            return Err(Rejected::new(self, error));
        }
        debug!(inscription = %self.identity, "inscription destroyed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapkit_store::MemoryStore;

    fn inscribed(store: &mut MemoryStore, payloads: &[&'static str]) -> Inscription {
        let mut inscription = Inscription::new(store);
        for &payload in payloads {
            inscription.inscribe(payload.as_bytes()).unwrap();
        }
        inscription
    }

    #[test]
    fn test_kind_follows_contents() {
        let mut store = MemoryStore::new();
        let mut inscription = Inscription::new(&mut store);
        assert!(inscription.kind().is_empty());

        inscription.inscribe(Bytes::from_static(b"hello")).unwrap();
        assert_eq!(inscription.kind(), &Kind::inscription());
        assert_eq!(inscription.payload(0).unwrap().as_ref(), b"hello");

        inscription.remove(0).unwrap();
        assert!(inscription.kind().is_empty());
    }

    #[test]
    fn test_remove_swaps_last_into_slot() {
        let mut store = MemoryStore::new();
        let mut inscription = inscribed(&mut store, &["a", "b", "c", "d"]);
        assert_eq!(inscription.remove(1).unwrap(), Bytes::from_static(b"b"));
        assert_eq!(inscription.payload(1).unwrap(), &Bytes::from_static(b"d"));
        assert_eq!(
            inscription.remove(3).unwrap_err(),
            WrapError::IndexOutOfBounds { index: 3, count: 3 }
        );
    }

    #[test]
    fn test_take_all_drain_order() {
        let mut store = MemoryStore::new();
        let mut inscription = inscribed(&mut store, &["a", "b", "c", "d"]);
        let drained: Vec<Bytes> = inscription.take_all();
        let expected: Vec<Bytes> = ["a", "d", "c", "b"]
            .iter()
            .map(|&s| Bytes::from_static(s.as_bytes()))
            .collect();
        assert_eq!(drained, expected);
        assert!(inscription.is_empty());
        assert!(inscription.kind().is_empty());
    }

    #[test]
    fn test_payload_size_limit() {
        let mut store = MemoryStore::with_limits(Limits {
            max_inscription_bytes: 4,
            ..Limits::default()
        });
        let mut inscription = Inscription::new(&mut store);
        inscription.inscribe(vec![0u8; 4]).unwrap();
        assert!(matches!(
            inscription.inscribe(vec![0u8; 5]),
            Err(WrapError::LimitExceeded(_))
        ));
        assert_eq!(inscription.count(), 1);
    }

    #[test]
    fn test_alias() {
        let mut store = MemoryStore::new();
        let mut inscription = Inscription::new(&mut store);
        inscription.set_alias("notes").unwrap();
        assert_eq!(inscription.alias(), "notes");
        assert!(inscription.set_alias("x".repeat(1024)).is_err());
    }

    #[test]
    fn test_destroy_empty() {
        let mut store = MemoryStore::new();
        let inscription = inscribed(&mut store, &["a"]);
        let identity = inscription.identity();

        let rejected = inscription.destroy_empty(&mut store).unwrap_err();
        assert_eq!(rejected.error(), &WrapError::NotEmpty { count: 1 });
        let mut inscription = rejected.into_value();
        inscription.take_all();
        inscription.destroy_empty(&mut store).unwrap();
        assert!(!store.is_live(identity));
    }
}
