//! Error types for field path operations.

use thiserror::Error;

/// Result type alias for field path operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or traversing a field path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The path expression had no segments.
    #[error("field path is empty")]
    EmptyPath,

    /// The path expression could not be parsed.
    #[error("cannot parse field path {path:?}: {reason} at position {position}")]
    Parse {
        path: String,
        position: usize,
        reason: &'static str,
    },

    /// A field or element along the path does not exist.
    #[error("{path}: {reason}")]
    NotFound { path: String, reason: &'static str },

    /// A field segment was applied to something that is not an object.
    #[error("{path}: not an object")]
    NotAnObject { path: String },

    /// An index segment was applied to something that is not an array.
    #[error("{path}: not an array")]
    NotAnArray { path: String },

    /// The value at the path is not of the requested type.
    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An array could not be grown to hold the addressed index.
    #[error("{path}: cannot grow array to hold index {index}")]
    ArrayTooLarge { path: String, index: usize },

    /// A typed object could not be converted to or from its unstructured form.
    #[error("cannot convert document: {reason}")]
    Conversion { reason: String },
}

impl Error {
    /// Create a parse error.
    pub fn parse(path: impl Into<String>, position: usize, reason: &'static str) -> Self {
        Self::Parse {
            path: path.into(),
            position,
            reason,
        }
    }

    /// Create a "no such field" error.
    pub fn no_such_field(path: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.into(),
            reason: "no such field",
        }
    }

    /// Create a "no such element" error.
    pub fn no_such_element(path: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.into(),
            reason: "no such element",
        }
    }

    /// Create a not-an-object error.
    pub fn not_an_object(path: impl Into<String>) -> Self {
        Self::NotAnObject { path: path.into() }
    }

    /// Create a not-an-array error.
    pub fn not_an_array(path: impl Into<String>) -> Self {
        Self::NotAnArray { path: path.into() }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Create an array-too-large error.
    pub fn array_too_large(path: impl Into<String>, index: usize) -> Self {
        Self::ArrayTooLarge {
            path: path.into(),
            index,
        }
    }

    /// Create a conversion error.
    pub fn conversion(reason: impl Into<String>) -> Self {
        Self::Conversion {
            reason: reason.into(),
        }
    }

    /// Returns true if the error only says the path does not exist.
    ///
    /// Callers use this to tell an optional, absent field apart from a
    /// malformed path or a document of the wrong shape.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
