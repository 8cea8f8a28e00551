//! Demo object types scenarios can mint
//!
//! These are deliberately separate from the `wrapkit-test-utils` fixtures of
//! the same shape. That crate is a dev-only dependency and its fixtures expose
//! public fields for assertions. The demo types keep their fields private, are
//! named under `wrapkit_cli::demo` so scenario output shows where they come
//! from, and implement [`DemoObject`] for the scenario dispatcher.

use serde::{Deserialize, Serialize};
use std::fmt;
use wrapkit::{Identity, IdentityStore, Object, TypeName, Typed};

/// Object types a scenario step can name
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoType {
    Ticket,
    Badge,
}

impl fmt::Display for DemoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoType::Ticket => f.write_str("ticket"),
            DemoType::Badge => f.write_str("badge"),
        }
    }
}

/// A storable object carrying a numeric payload
pub trait DemoObject: Object + Sized {
    const TYPE: DemoType;

    fn mint<S: IdentityStore>(store: &mut S, payload: u64) -> Self;

    fn payload(&self) -> u64;
}

macro_rules! demo_object {
    ($name:ident, $variant:ident) => {
        #[derive(Debug)]
        pub struct $name {
            id: Identity,
            payload: u64,
        }

        impl Typed for $name {
            fn type_name() -> TypeName {
                TypeName::new("wrapkit_cli::demo", stringify!($name))
            }
        }

        impl Object for $name {
            fn id(&self) -> Identity {
                self.id
            }
        }

        impl DemoObject for $name {
            const TYPE: DemoType = DemoType::$variant;

            fn mint<S: IdentityStore>(store: &mut S, payload: u64) -> Self {
                Self {
                    id: store.new_identity(),
                    payload,
                }
            }

            fn payload(&self) -> u64 {
                self.payload
            }
        }
    };
}

demo_object!(Ticket, Ticket);
demo_object!(Badge, Badge);
