//! Patch and transform engine for resource compositions.
//!
//! A [`Composition`] describes how composed resources are derived from a
//! composite resource. Each [`ComposedTemplate`] holds a base document and
//! an ordered list of [`Patch`]es; each patch reads fields from one
//! document, runs them through a chain of [`Transform`]s and writes the
//! result into the other.
//!
//! The usual flow per reconcile:
//!
//! 1. [`CompositionSpec::inline_patch_sets`] (or [`Composition::inlined`])
//!    expands PatchSet references.
//! 2. [`ComposedTemplate::render`] renders the base and the composite's
//!    metadata, then applies the patches.
//! 3. [`ComposedTemplate::is_ready`] and [`extract_connection_details`]
//!    observe the composed resource.

#![forbid(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(clippy::panic)]

pub mod config;
pub mod connection;
pub mod error;
pub mod format;
mod inline;
pub mod patch;
pub mod readiness;
pub mod render;
pub mod transform;
pub mod types;
pub mod value;

pub use config::RenderConfig;
pub use connection::{ConnectionDetail, ConnectionDetailType, ConnectionDetails, extract_connection_details};
pub use error::{Error, ErrorClass, Result};
pub use patch::{Patch, PatchType};
pub use readiness::{ReadinessCheck, ReadinessCheckType, is_ready};
pub use render::{render_composed_metadata, render_from_base};
pub use transform::{CombineTransform, ConvertTransform, MapTransform, MathTransform, StringCombine, StringTransform, Transform};
pub use types::{ComposedTemplate, Composition, CompositionSpec, ObjectMeta, PatchSet, TypeReference};
pub use value::Kind;
