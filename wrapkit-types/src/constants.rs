//! Constants shared across the wrapkit crates

/// Module path under which the wrapper type is named.
pub const WRAPPER_MODULE: &str = "wrapkit::wrapper";
/// Type name of the wrapper itself; a wrapper holding wrappers carries this kind.
pub const WRAPPER_TYPE: &str = "Wrapper";

/// Module path of the inscription payload type.
pub const INSCRIPTION_MODULE: &str = "wrapkit::inscription";
/// Type name recorded as the kind of a non-empty inscription.
pub const INSCRIPTION_TYPE: &str = "Payload";

/// Display form of the empty kind sentinel.
///
/// Canonical type names always contain `::` or are primitive names, so this
/// string never collides with a real type.
pub const EMPTY_KIND: &str = "<empty>";

/// Hard cap on `Limits::max_members`.
pub const HARD_MAX_MEMBERS: usize = 1_000_000;
/// Hard cap on `Limits::max_alias_bytes`.
pub const HARD_MAX_ALIAS_BYTES: usize = 64 * 1024;
/// Hard cap on `Limits::max_inscription_bytes` (16 MiB).
pub const HARD_MAX_INSCRIPTION_BYTES: usize = 16 * 1024 * 1024;
