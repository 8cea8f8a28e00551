//! Canonical type names and kind tags
//!
//! A wrapper records the type of its members as a [`Kind`]: either the empty
//! sentinel or the canonical name of one concrete type. Canonical names are
//! supplied statically by every storable type through [`Typed`], never derived
//! by reflection, so they are identical across builds and hosts.
//!
//! The canonical form is `module::path::Name<Param, ...>`. Two types compare
//! equal only when their full canonical strings are equal; identically shaped
//! types with different declared names are different kinds.
//!
//! Rendering is injective. Characters that carry structure (`<`, `>`, `,`,
//! space, `\`, and `:` inside a type name) are escaped with a backslash, and a
//! declared type with an empty module renders as `::Name` so it can never
//! collide with a primitive.

use crate::constants::{
    EMPTY_KIND, INSCRIPTION_MODULE, INSCRIPTION_TYPE, WRAPPER_MODULE, WRAPPER_TYPE,
};
use crate::error::{Result, WrapError};
use crate::identity::Identity;
use serde::{Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Deterministic, fully qualified name of a concrete type.
#[derive(Debug, Clone)]
pub struct TypeName {
    module: Option<String>,
    name: String,
    params: Vec<TypeName>,
    canonical: String,
}

impl TypeName {
    /// Name a non-generic type declared in `module`.
    pub fn new(module: &str, name: &str) -> Self {
        Self::generic(module, name, Vec::new())
    }

    /// Name a builtin type that has no module path (`u64`, `bool`, ...).
    pub fn primitive(name: &str) -> Self {
        Self::build(None, name, Vec::new())
    }

    /// Name a generic instantiation; parameter order is significant.
    pub fn generic(module: &str, name: &str, params: Vec<TypeName>) -> Self {
        Self::build(Some(module), name, params)
    }

    fn build(module: Option<&str>, name: &str, params: Vec<TypeName>) -> Self {
        let canonical = render(module, name, &params);
        Self {
            module: module.map(str::to_string),
            name: name.to_string(),
            params,
            canonical,
        }
    }

    /// Append one generic parameter.
    pub fn with_param(mut self, param: TypeName) -> Self {
        self.params.push(param);
        self.canonical = render(self.module.as_deref(), &self.name, &self.params);
        self
    }

    /// Module path, empty for primitives.
    pub fn module(&self) -> &str {
        self.module.as_deref().unwrap_or_default()
    }

    /// True for builtin types named without a module path.
    pub fn is_primitive(&self) -> bool {
        self.module.is_none()
    }

    /// Declared type name without module path or parameters.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generic parameters in declaration order.
    pub fn params(&self) -> &[TypeName] {
        &self.params
    }

    /// Full canonical string used for all comparisons.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

fn render(module: Option<&str>, name: &str, params: &[TypeName]) -> String {
    let mut out = String::with_capacity(module.map_or(0, str::len) + name.len() + 2);
    if let Some(module) = module {
        escape_into(&mut out, module, false);
        out.push_str("::");
    }
    escape_into(&mut out, name, true);
    if !params.is_empty() {
        out.push('<');
        for (idx, param) in params.iter().enumerate() {
            if idx > 0 {
                out.push_str(", ");
            }
            out.push_str(param.canonical());
        }
        out.push('>');
    }
    out
}

// Module paths keep their `::` separators; a type name may not contain an
// unescaped `:`, so the last `::` always separates module from name.
fn escape_into(out: &mut String, segment: &str, escape_colons: bool) {
    for ch in segment.chars() {
        if matches!(ch, '\\' | '<' | '>' | ',' | ' ') || (escape_colons && ch == ':') {
            out.push('\\');
        }
        out.push(ch);
    }
}

impl PartialEq for TypeName {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for TypeName {}

impl Hash for TypeName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl Serialize for TypeName {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

/// Types that can state their own canonical name.
pub trait Typed {
    /// Canonical name of `Self`, including generic parameters.
    fn type_name() -> TypeName;
}

/// A resource that can be held by a wrapper.
///
/// Objects carry their own identity; a wrapper keys the stored object by it.
pub trait Object: Typed + Any + Send {
    /// Identity of this object.
    fn id(&self) -> Identity;
}

macro_rules! impl_typed_primitive {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn type_name() -> TypeName {
                    TypeName::primitive($name)
                }
            }
        )*
    };
}

impl_typed_primitive! {
    bool => "bool",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    i64 => "i64",
    String => "string",
}

impl<T: Typed> Typed for Vec<T> {
    fn type_name() -> TypeName {
        TypeName::primitive("vector").with_param(T::type_name())
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_name() -> TypeName {
        TypeName::primitive("option").with_param(T::type_name())
    }
}

/// Type tag recorded by a wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    /// Sentinel: the wrapper holds nothing.
    #[default]
    Empty,
    /// Every member has this concrete type.
    Of(TypeName),
}

impl Kind {
    /// Kind for members of type `T`.
    pub fn of<T: Typed>() -> Self {
        Kind::Of(T::type_name())
    }

    /// Kind of a wrapper that holds other wrappers.
    pub fn nested() -> Self {
        Kind::Of(TypeName::new(WRAPPER_MODULE, WRAPPER_TYPE))
    }

    /// Kind of a non-empty inscription.
    pub fn inscription() -> Self {
        Kind::Of(TypeName::new(INSCRIPTION_MODULE, INSCRIPTION_TYPE))
    }

    /// True for the empty sentinel.
    pub fn is_empty(&self) -> bool {
        matches!(self, Kind::Empty)
    }

    /// True when the members are themselves wrappers.
    pub fn is_nested(&self) -> bool {
        match self {
            Kind::Of(name) => name.module() == WRAPPER_MODULE && name.name() == WRAPPER_TYPE,
            Kind::Empty => false,
        }
    }

    /// Recorded type name, if any.
    pub fn type_name(&self) -> Option<&TypeName> {
        match self {
            Kind::Of(name) => Some(name),
            Kind::Empty => None,
        }
    }

    /// Canonical string, or the sentinel display form.
    pub fn as_str(&self) -> &str {
        match self {
            Kind::Of(name) => name.canonical(),
            Kind::Empty => EMPTY_KIND,
        }
    }

    /// True when the recorded kind is exactly `T`.
    pub fn matches<T: Typed>(&self) -> bool {
        self.matches_name(&T::type_name())
    }

    /// True when the recorded kind is exactly `name`.
    pub fn matches_name(&self, name: &TypeName) -> bool {
        match self {
            Kind::Of(recorded) => recorded == name,
            Kind::Empty => false,
        }
    }

    /// Require the recorded kind to be exactly `T`.
    pub fn ensure<T: Typed>(&self) -> Result<()> {
        let expected = T::type_name();
        if self.matches_name(&expected) {
            Ok(())
        } else {
            Err(WrapError::type_mismatch(expected, self))
        }
    }

    /// Require that a `T` may be added: the kind is empty or exactly `T`.
    pub fn admits<T: Typed>(&self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            self.ensure::<T>()
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Kind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
