#![forbid(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(clippy::panic)]

//! # patchform
//!
//! Declarative patch and transform engine. Derives composed resources from a
//! composite resource by copying fields between the two documents through
//! chains of pure value transforms.
//!
//! This library re-exports the workspace crates for convenience.

pub use patchform_composition;
pub use patchform_core;
pub use patchform_fieldpath;

pub mod prelude;
pub mod telemetry;
