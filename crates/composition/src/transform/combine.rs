//! The combine resolver, reducing many values to one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::format::sprintf;

/// Reduces every input value to a single value.
///
/// Written on the wire like a transform: `{type: string, string: {fmt: ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CombineSpec", into = "CombineSpec")]
pub enum CombineTransform {
    /// Format all inputs positionally into one template.
    String(StringCombine),
}

/// A printf-style template receiving every input as an operand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringCombine {
    #[serde(rename = "fmt")]
    pub format: String,
}

impl StringCombine {
    /// A combiner with the given printf-style template.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// Format every value into the template.
    pub fn combine(&self, values: &[Value]) -> Value {
        Value::String(sprintf(&self.format, values))
    }
}

impl CombineTransform {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
        }
    }

    /// Reduce `values` to one value.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NoInputValues`] on an empty input.
    pub fn resolve(&self, values: &[Value]) -> Result<Value> {
        if values.is_empty() {
            return Err(Error::NoInputValues);
        }
        match self {
            Self::String(s) => Ok(s.combine(values)),
        }
    }
}

/// Wire form of a [`CombineTransform`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombineSpec {
    #[serde(rename = "type")]
    pub combine_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<StringCombine>,
}

impl TryFrom<CombineSpec> for CombineTransform {
    type Error = Error;

    fn try_from(spec: CombineSpec) -> Result<Self> {
        match spec.combine_type.as_str() {
            "string" => spec
                .string
                .map(Self::String)
                .ok_or_else(|| Error::config_missing("string")),
            other => Err(Error::unsupported_combine_type(other)),
        }
    }
}

impl From<CombineTransform> for CombineSpec {
    fn from(combine: CombineTransform) -> Self {
        let combine_type = combine.type_name().to_string();
        match combine {
            CombineTransform::String(s) => Self {
                combine_type,
                string: Some(s),
            },
        }
    }
}
