//! wrapkit - Type-homogeneous wrappers
//!
//! A [`Wrapper`] aggregates objects of one concrete type under a single
//! identity so they can be handed around as a unit, then subdivided or
//! recombined without ever mixing types. This crate provides:
//!
//! - The [`Wrapper`] container and its byte-payload sibling [`Inscription`]
//! - Set algebra: [`merge`], [`shift`], [`split`], [`split_with_index`] and
//!   [`split_with_id`]
//! - [`Runtime`] and [`RuntimeConfig`] for explicit setup and teardown
//!
//! ```
//! use wrapkit::{merge, MemoryStore, Wrapper};
//! # use wrapkit::{Identity, IdentityStore, Object, TypeName, Typed};
//! # #[derive(Debug)]
//! # struct Coin { id: Identity }
//! # impl Typed for Coin {
//! #     fn type_name() -> TypeName { TypeName::new("demo", "Coin") }
//! # }
//! # impl Object for Coin {
//! #     fn id(&self) -> Identity { self.id }
//! # }
//!
//! let mut store = MemoryStore::new();
//! let mut purse = Wrapper::new(&mut store);
//! let coin = Coin { id: store.new_identity() };
//! purse.add(&mut store, coin).unwrap();
//!
//! let other = Wrapper::new(&mut store);
//! let purse = merge::<Coin, _>(&mut store, purse, other).unwrap();
//! assert_eq!(purse.count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod algebra;
pub mod config;
pub mod inscription;
pub mod runtime;
pub mod wrapper;

// Re-export commonly used types
pub use wrapkit_store::{IdentityStore, MemoryStore, StoreStats};
pub use wrapkit_types::{
    Identity, Kind, Limits, Object, Rejected, Result, TypeName, Typed, WrapError,
};

// Re-export our own types
pub use algebra::{merge, shift, split, split_with_id, split_with_index};
pub use config::RuntimeConfig;
pub use inscription::Inscription;
pub use runtime::Runtime;
pub use wrapper::Wrapper;
