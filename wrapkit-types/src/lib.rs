//! wrapkit Types - Core primitives for type-homogeneous wrappers
//!
//! This crate provides the vocabulary shared by every wrapkit crate, with no
//! storage or algorithm code. It includes:
//!
//! - Opaque object identities
//! - Canonical type names and the `Kind` tag
//! - The `Typed` and `Object` capability traits
//! - Error types
//! - Limits
//! - Constants

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod identity;
pub mod kind;
pub mod limits;

// Re-export commonly used types
pub use error::{Rejected, Result, WrapError};
pub use identity::Identity;
pub use kind::{Kind, Object, TypeName, Typed};
pub use limits::Limits;
