//! Error types for the composition crate.
//!
//! Every failure carries enough positional context (patch index, transform
//! index, resolver name, element index) to locate it inside a composition.
//! [`Error::class`] maps each variant onto the coarse taxonomy callers
//! branch on.

use thiserror::Error;

use crate::value::Kind;

/// Result type alias for composition operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Structural problems in the composition itself.
    Validation,
    /// An unknown tag, or a tag without its configuration payload.
    UnsupportedType,
    /// A value could not be processed by a transform.
    Resolution,
    /// A transform chain ended with more than one value.
    CombineRequired,
    /// A field path was malformed, a document had the wrong shape, or a
    /// document could not be loaded.
    Document,
}

/// Composition error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // Validation
    #[error("a patch in PatchSet {patch_set} cannot be of type PatchSet")]
    NestedPatchSet { patch_set: String },

    #[error("{field} is required by type {owner}")]
    RequiredField { field: &'static str, owner: String },

    #[error("cannot find PatchSet by name {name}")]
    UndefinedPatchSet { name: String },

    #[error("cannot change the kind of a composed resource from {from} to {to}")]
    KindChanged { from: String, to: String },

    #[error("cannot set controller reference: {composed} is already controlled by {kind} {name} (UID {uid})")]
    ControllerConflict {
        composed: String,
        kind: String,
        name: String,
        uid: String,
    },

    // Unsupported types
    #[error("patch type {patch_type} is unsupported")]
    InvalidPatchType { patch_type: String },

    #[error("transform type {transform_type} is not supported")]
    UnsupportedTransformType { transform_type: String },

    #[error("combine type {combine_type} is not supported")]
    UnsupportedCombineType { combine_type: String },

    #[error("given type {type_name} requires configuration")]
    ConfigMissing { type_name: String },

    // Resolution
    #[error("no multiplier is given")]
    NoMultiplier,

    #[error("input is required to be a number for math transformer")]
    NonNumericInput,

    #[error("multiplying {value} by {multiplier} overflows a 64-bit integer")]
    MathOverflow { value: i64, multiplier: i64 },

    #[error("type {kind} is not supported for map transform")]
    UnsupportedMapInputType { kind: &'static str },

    #[error("key {key} is not found in map")]
    KeyNotFound { key: String },

    #[error("input type {kind} is not supported")]
    UnsupportedInputKind { kind: &'static str },

    #[error("conversion from {from} to {to} is not supported")]
    UnsupportedConversionPair { from: Kind, to: Kind },

    #[error("cannot convert {input:?} to {target}: {reason}")]
    ParseFailed {
        input: String,
        target: Kind,
        reason: String,
    },

    #[error("no input values")]
    NoInputValues,

    #[error("multiple output values returned - please add a combine transform")]
    CombineRequired { count: usize },

    // Positional context
    #[error("could not resolve input value at index {index}: {source}")]
    ResolveAtIndex { index: usize, source: Box<Error> },

    #[error("{transform} transform could not resolve: {source}")]
    TransformFailed {
        transform: &'static str,
        source: Box<Error>,
    },

    #[error("transform at index {index} returned error: {source}")]
    TransformAtIndex { index: usize, source: Box<Error> },

    #[error("cannot apply the patch at index {index}: {source}")]
    PatchAtIndex { index: usize, source: Box<Error> },

    #[error("cannot evaluate readiness check at index {index}: {source}")]
    ReadinessCheckAtIndex { index: usize, source: Box<Error> },

    #[error("cannot extract connection detail at index {index}: {source}")]
    ConnectionDetailAtIndex { index: usize, source: Box<Error> },

    // Documents
    #[error(transparent)]
    FieldPath(#[from] patchform_fieldpath::Error),

    #[error(transparent)]
    Load(#[from] patchform_core::Error),
}

impl Error {
    /// Create a nested PatchSet error.
    pub fn nested_patch_set(patch_set: impl Into<String>) -> Self {
        Self::NestedPatchSet {
            patch_set: patch_set.into(),
        }
    }

    /// Create a required field error.
    pub fn required_field(field: &'static str, owner: impl Into<String>) -> Self {
        Self::RequiredField {
            field,
            owner: owner.into(),
        }
    }

    /// Create an undefined PatchSet error.
    pub fn undefined_patch_set(name: impl Into<String>) -> Self {
        Self::UndefinedPatchSet { name: name.into() }
    }

    /// Create a kind changed error.
    pub fn kind_changed(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::KindChanged {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a controller conflict error for `composed`, naming the
    /// existing controller.
    pub fn controller_conflict(
        composed: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
        uid: impl Into<String>,
    ) -> Self {
        Self::ControllerConflict {
            composed: composed.into(),
            kind: kind.into(),
            name: name.into(),
            uid: uid.into(),
        }
    }

    /// Create an invalid patch type error.
    pub fn invalid_patch_type(patch_type: impl Into<String>) -> Self {
        Self::InvalidPatchType {
            patch_type: patch_type.into(),
        }
    }

    /// Create an unsupported transform type error.
    pub fn unsupported_transform_type(transform_type: impl Into<String>) -> Self {
        Self::UnsupportedTransformType {
            transform_type: transform_type.into(),
        }
    }

    /// Create an unsupported combine type error.
    pub fn unsupported_combine_type(combine_type: impl Into<String>) -> Self {
        Self::UnsupportedCombineType {
            combine_type: combine_type.into(),
        }
    }

    /// Create a config missing error.
    pub fn config_missing(type_name: impl Into<String>) -> Self {
        Self::ConfigMissing {
            type_name: type_name.into(),
        }
    }

    /// Create a key not found error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Create a parse failed error.
    pub fn parse_failed(input: impl Into<String>, target: Kind, reason: impl Into<String>) -> Self {
        Self::ParseFailed {
            input: input.into(),
            target,
            reason: reason.into(),
        }
    }

    /// Tag an element-level failure with the element's index.
    pub fn resolve_at_index(index: usize, source: Self) -> Self {
        Self::ResolveAtIndex {
            index,
            source: Box::new(source),
        }
    }

    /// Tag a resolver failure with the resolver's name.
    pub fn transform_failed(transform: &'static str, source: Self) -> Self {
        Self::TransformFailed {
            transform,
            source: Box::new(source),
        }
    }

    /// Tag a chain failure with the failing step's index.
    pub fn transform_at_index(index: usize, source: Self) -> Self {
        Self::TransformAtIndex {
            index,
            source: Box::new(source),
        }
    }

    /// Tag a patch failure with the patch's index in its template.
    pub fn patch_at_index(index: usize, source: Self) -> Self {
        Self::PatchAtIndex {
            index,
            source: Box::new(source),
        }
    }

    /// Tag a readiness check failure with the check's index.
    pub fn readiness_check_at_index(index: usize, source: Self) -> Self {
        Self::ReadinessCheckAtIndex {
            index,
            source: Box::new(source),
        }
    }

    /// Tag a connection detail failure with the detail's index.
    pub fn connection_detail_at_index(index: usize, source: Self) -> Self {
        Self::ConnectionDetailAtIndex {
            index,
            source: Box::new(source),
        }
    }

    /// The innermost error, with all positional context removed.
    pub fn root(&self) -> &Self {
        match self {
            Self::ResolveAtIndex { source, .. }
            | Self::TransformFailed { source, .. }
            | Self::TransformAtIndex { source, .. }
            | Self::PatchAtIndex { source, .. }
            | Self::ReadinessCheckAtIndex { source, .. }
            | Self::ConnectionDetailAtIndex { source, .. } => source.root(),
            other => other,
        }
    }

    /// Classify this error, looking through positional context.
    pub fn class(&self) -> ErrorClass {
        match self.root() {
            Self::NestedPatchSet { .. }
            | Self::RequiredField { .. }
            | Self::UndefinedPatchSet { .. }
            | Self::KindChanged { .. }
            | Self::ControllerConflict { .. } => ErrorClass::Validation,
            Self::InvalidPatchType { .. }
            | Self::UnsupportedTransformType { .. }
            | Self::UnsupportedCombineType { .. }
            | Self::ConfigMissing { .. } => ErrorClass::UnsupportedType,
            Self::CombineRequired { .. } => ErrorClass::CombineRequired,
            Self::FieldPath(patchform_fieldpath::Error::TypeMismatch { .. }) => {
                ErrorClass::Resolution
            }
            Self::FieldPath(_) | Self::Load(_) => ErrorClass::Document,
            _ => ErrorClass::Resolution,
        }
    }
}
