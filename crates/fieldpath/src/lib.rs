//! Field paths over unstructured documents.
//!
//! This crate is the document accessor used by the patch engine:
//!
//! - [`Segments`] parses expressions such as `spec.parameters.region`,
//!   `status.ids[0]` or `metadata.labels[example.org/app]`.
//! - [`Paved`] and the [`FieldAccess`] trait read and write values at a path,
//!   telling an absent field apart from a malformed path.
//! - [`to_unstructured`] and [`from_unstructured`] let typed objects be
//!   patched through their `serde_json::Value` form.

#![forbid(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(clippy::panic)]

pub mod convert;
pub mod error;
pub mod paved;
pub mod segment;

pub use convert::{from_unstructured, to_unstructured};
pub use error::{Error, Result};
pub use paved::{FieldAccess, MAX_ARRAY_INDEX, Paved, get_in, set_in, type_name};
pub use segment::{Segment, Segments};
