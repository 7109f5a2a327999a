//! Prelude module - common imports for patchform
//!
//! Import this module to get all common types and traits:
//! ```rust
//! use patchform::prelude::*;
//! ```

// Re-export error handling
pub use patchform_composition::{Error, ErrorClass, Result};
pub use patchform_core::ResultExt;

// Re-export the composition model
pub use patchform_composition::{
    ComposedTemplate, Composition, CompositionSpec, ConnectionDetail, ConnectionDetailType,
    ConnectionDetails, ObjectMeta, PatchSet, TypeReference,
};

// Re-export the patch engine
pub use patchform_composition::{
    Kind, Patch, PatchType, ReadinessCheck, ReadinessCheckType, RenderConfig, Transform,
    extract_connection_details, is_ready, render_composed_metadata, render_from_base,
};

// Re-export field access
pub use patchform_fieldpath::{FieldAccess, Paved};
