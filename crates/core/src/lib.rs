//! Core types, errors, and document loading shared by the patchform crates.

#![forbid(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(clippy::panic)]

pub mod document;
pub mod error;
pub mod result;

pub use error::Error;
pub use result::{Result, ResultExt};
