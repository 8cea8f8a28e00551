//! Error types for wrapkit

use crate::identity::Identity;
use std::fmt;
use thiserror::Error;

/// wrapkit error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WrapError {
    /// Requested position is not below the current member count.
    #[error("Index out of bounds: {index} (count: {count})")]
    IndexOutOfBounds {
        /// Requested position
        index: usize,
        /// Member count at the time of the request
        count: usize,
    },
    /// The requested type does not match the recorded kind.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Canonical name the operation asked for
        expected: String,
        /// Canonical name (or empty sentinel) actually recorded
        found: String,
    },
    /// Identifier lookup found no matching, correctly-typed member.
    #[error("Member not found: {0}")]
    NotFound(Identity),
    /// Identifier is absent or its stored type differs from the requested one.
    #[error("Member not found or not of the requested kind: {0}")]
    NotFoundOrTypeMismatch(Identity),
    /// Terminal operation attempted on a wrapper that still holds members.
    #[error("Wrapper is not empty: {count} member(s) remain")]
    NotEmpty {
        /// Members still held
        count: usize,
    },
    /// An object with this identity is already a member.
    #[error("Duplicate member: {0}")]
    DuplicateMember(Identity),
    /// A configured limit was exceeded.
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
    /// The identity store is inconsistent with the caller's view of it.
    #[error("Store error: {0}")]
    Store(String),
    /// Configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WrapError {
    /// Build a `TypeMismatch` from anything printable as a kind.
    pub fn type_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        WrapError::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, WrapError>;

/// A failed consuming operation, handing the consumed value back.
///
/// Operations that take ownership of an object or a wrapper return it inside
/// `Rejected` when they fail, so a failure never destroys a resource.
#[derive(Debug)]
pub struct Rejected<T> {
    value: T,
    error: WrapError,
}

impl<T> Rejected<T> {
    /// Pair a returned value with the reason it was rejected.
    pub fn new(value: T, error: WrapError) -> Self {
        Self { value, error }
    }

    /// Reason for the rejection.
    pub fn error(&self) -> &WrapError {
        &self.error
    }

    /// Borrow the returned value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take the returned value, discarding the error.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Split into the returned value and the error.
    pub fn into_parts(self) -> (T, WrapError) {
        (self.value, self.error)
    }

    /// Transform the returned value, keeping the error.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Rejected<U> {
        Rejected {
            value: f(self.value),
            error: self.error,
        }
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl<T: fmt::Debug> std::error::Error for Rejected<T> {}

impl<T> From<Rejected<T>> for WrapError {
    fn from(rejected: Rejected<T>) -> Self {
        rejected.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WrapError::IndexOutOfBounds { index: 4, count: 4 };
        assert_eq!(err.to_string(), "Index out of bounds: 4 (count: 4)");

        let err = WrapError::type_mismatch("demo::Ticket", "<empty>");
        assert_eq!(
            err.to_string(),
            "Type mismatch: expected demo::Ticket, found <empty>"
        );

        let err = WrapError::NotEmpty { count: 2 };
        assert!(err.to_string().contains("2 member(s)"));
    }

    #[test]
    fn test_rejected_returns_value() {
        let rejected = Rejected::new(vec![1u8, 2], WrapError::NotEmpty { count: 2 });
        assert_eq!(rejected.to_string(), "Wrapper is not empty: 2 member(s) remain");
        assert_eq!(rejected.value(), &vec![1, 2]);

        let (value, error) = rejected.map(|v| v.len()).into_parts();
        assert_eq!(value, 2);
        assert_eq!(WrapError::from(Rejected::new((), error.clone())), error);
    }

    #[test]
    fn test_identity_in_message() {
        let err = WrapError::NotFound(Identity::from_raw(0x2a));
        assert_eq!(err.to_string(), "Member not found: 0x000000000000002a");
    }
}
