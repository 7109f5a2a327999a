//! The string resolver.

use std::slice;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::resolve_multiple;
use crate::error::Result;
use crate::format::sprintf;

/// Formats each input with a printf-style template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringTransform {
    #[serde(rename = "fmt")]
    pub format: String,
}

impl StringTransform {
    /// A string transform using `format`.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// Format every value on its own.
    ///
    /// Formatting problems are rendered inline, so this only fails on an
    /// empty input.
    pub fn resolve(&self, values: &[Value]) -> Result<Vec<Value>> {
        resolve_multiple(values, |value| {
            Ok(Value::String(sprintf(&self.format, slice::from_ref(value))))
        })
    }
}
