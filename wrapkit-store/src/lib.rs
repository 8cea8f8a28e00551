//! wrapkit Store - Keyed object storage for wrappers
//!
//! Wrappers never hold their members directly. Each member lives in an
//! identity store under the key `(owner identity, member identity)`, the way a
//! host platform stores child objects under their parent. This crate provides:
//!
//! - The [`IdentityStore`] trait wrappers are written against
//! - [`MemoryStore`], an in-memory implementation for tests and tools

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod memory;
pub mod store;

// Re-export commonly used types
pub use wrapkit_types::{
    Identity, Kind, Limits, Object, Rejected, Result, TypeName, Typed, WrapError,
};

// Re-export our own types
pub use memory::{MemoryStore, StoreStats};
pub use store::IdentityStore;
