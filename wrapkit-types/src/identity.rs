//! Opaque object identities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, opaque handle for a stored object or a wrapper.
///
/// Identities are minted by an identity store and are never reused while the
/// store is alive. Ordering is provided only so identities can key ordered maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(u64);

impl Identity {
    /// Wrap a raw value minted by a store.
    pub const fn from_raw(raw: u64) -> Self {
        Identity(raw)
    }

    /// Raw value backing this identity.
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_fixed_width_hex() {
        assert_eq!(Identity::from_raw(1).to_string(), "0x0000000000000001");
        assert_eq!(
            Identity::from_raw(u64::MAX).to_string(),
            "0xffffffffffffffff"
        );
    }

    #[test]
    fn test_serde_transparent() {
        let id = Identity::from_raw(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
