//! Transforms applied to the values flowing through a patch.
//!
//! A [`Transform`] is a closed set of resolvers. On the wire each transform
//! is written as a type tag plus a payload keyed by that tag:
//!
//! ```yaml
//! - type: map
//!   map:
//!     us: us-east-1
//! - type: math
//!   math:
//!     multiply: 1024
//! ```
//!
//! Decoding rejects unknown tags and tags whose payload is absent, so a
//! decoded [`Transform`] always carries its configuration.

mod chain;
mod combine;
mod convert;
mod map;
mod math;
mod string;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::value::Kind;

pub use chain::run;
pub use combine::{CombineSpec, CombineTransform, StringCombine};
pub use convert::{ConvertTransform, Conversion, conversion_for, convert};
pub use map::MapTransform;
pub use math::MathTransform;
pub use string::StringTransform;

/// A single step of a transform chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TransformSpec", into = "TransformSpec")]
pub enum Transform {
    /// Multiply integer values.
    Math(MathTransform),
    /// Look string values up in a static table.
    Map(MapTransform),
    /// Format each value with a printf-style template.
    String(StringTransform),
    /// Convert each value to another scalar kind.
    Convert(ConvertTransform),
    /// Reduce every value to one.
    Combine(CombineTransform),
}

impl Transform {
    /// A math transform multiplying by `multiplier`.
    pub const fn math(multiplier: i64) -> Self {
        Self::Math(MathTransform::multiply(multiplier))
    }

    /// A map transform over the given pairs.
    pub fn map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Map(MapTransform::new(pairs))
    }

    /// A string transform using `format`.
    pub fn string(format: impl Into<String>) -> Self {
        Self::String(StringTransform::new(format))
    }

    /// A convert transform targeting `to`.
    pub const fn convert(to: Kind) -> Self {
        Self::Convert(ConvertTransform::new(to))
    }

    /// A string combine using `format`.
    pub fn combine_string(format: impl Into<String>) -> Self {
        Self::Combine(CombineTransform::String(StringCombine::new(format)))
    }

    /// The transform's wire tag.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Math(_) => "math",
            Self::Map(_) => "map",
            Self::String(_) => "string",
            Self::Convert(_) => "convert",
            Self::Combine(_) => "combine",
        }
    }

    /// Resolve `values` through this transform.
    ///
    /// Element-wise transforms return as many values as they were given;
    /// combine returns exactly one.
    pub fn resolve(&self, values: &[Value]) -> Result<Vec<Value>> {
        let resolved = match self {
            Self::Math(m) => m.resolve(values),
            Self::Map(m) => m.resolve(values),
            Self::String(s) => s.resolve(values),
            Self::Convert(c) => c.resolve(values),
            Self::Combine(c) => c.resolve(values).map(|v| vec![v]),
        };
        resolved.map_err(|e| Error::transform_failed(self.type_name(), e))
    }
}

/// Wire form of a [`Transform`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSpec {
    #[serde(rename = "type")]
    pub transform_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub math: Option<MathTransform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapTransform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<StringTransform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convert: Option<ConvertTransform>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combine: Option<CombineTransform>,
}

impl TryFrom<TransformSpec> for Transform {
    type Error = Error;

    fn try_from(spec: TransformSpec) -> Result<Self> {
        let TransformSpec {
            transform_type,
            math,
            map,
            string,
            convert,
            combine,
        } = spec;
        let missing = || Error::config_missing(transform_type.as_str());
        match transform_type.as_str() {
            "math" => math.map(Self::Math).ok_or_else(missing),
            "map" => map.map(Self::Map).ok_or_else(missing),
            "string" => string.map(Self::String).ok_or_else(missing),
            "convert" => convert.map(Self::Convert).ok_or_else(missing),
            "combine" => combine.map(Self::Combine).ok_or_else(missing),
            other => Err(Error::unsupported_transform_type(other)),
        }
    }
}

impl From<Transform> for TransformSpec {
    fn from(transform: Transform) -> Self {
        let transform_type = transform.type_name().to_string();
        let spec = Self {
            transform_type,
            ..Self::default()
        };
        match transform {
            Transform::Math(m) => Self {
                math: Some(m),
                ..spec
            },
            Transform::Map(m) => Self {
                map: Some(m),
                ..spec
            },
            Transform::String(s) => Self {
                string: Some(s),
                ..spec
            },
            Transform::Convert(c) => Self {
                convert: Some(c),
                ..spec
            },
            Transform::Combine(c) => Self {
                combine: Some(c),
                ..spec
            },
        }
    }
}

/// Apply `resolve` to every value, preserving order and length.
///
/// A single value's error is returned as-is; with several values each error
/// is tagged with the index of the value that failed.
pub(crate) fn resolve_multiple<F>(values: &[Value], resolve: F) -> Result<Vec<Value>>
where
    F: Fn(&Value) -> Result<Value>,
{
    match values {
        [] => Err(Error::NoInputValues),
        [only] => resolve(only).map(|v| vec![v]),
        _ => values
            .iter()
            .enumerate()
            .map(|(i, v)| resolve(v).map_err(|e| Error::resolve_at_index(i, e)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_map_transform() -> std::result::Result<(), serde_json::Error> {
        let transform: Transform =
            serde_json::from_value(json!({"type": "map", "map": {"us": "us-east-1"}}))?;
        assert_eq!(transform, Transform::map([("us", "us-east-1")]));
        Ok(())
    }

    #[test]
    fn test_decode_each_tag() -> std::result::Result<(), serde_json::Error> {
        let transforms: Vec<Transform> = serde_json::from_value(json!([
            {"type": "math", "math": {"multiply": 2}},
            {"type": "string", "string": {"fmt": "db-%s"}},
            {"type": "convert", "convert": {"toType": "int"}},
            {"type": "combine", "combine": {"type": "string", "string": {"fmt": "%s-%s"}}},
        ]))?;
        assert_eq!(
            transforms,
            vec![
                Transform::math(2),
                Transform::string("db-%s"),
                Transform::convert(Kind::Int),
                Transform::combine_string("%s-%s"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_encode_reproduces_wire_form() -> std::result::Result<(), serde_json::Error> {
        let encoded = serde_json::to_value(Transform::convert(Kind::Float64))?;
        assert_eq!(encoded, json!({"type": "convert", "convert": {"toType": "float64"}}));
        Ok(())
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let spec = TransformSpec {
            transform_type: "reverse".to_string(),
            ..TransformSpec::default()
        };
        let err = Transform::try_from(spec).err();
        assert_eq!(err, Some(Error::unsupported_transform_type("reverse")));
        assert_eq!(err.map(|e| e.class()), Some(ErrorClass::UnsupportedType));
    }

    #[test]
    fn test_missing_payload_is_rejected() {
        let spec = TransformSpec {
            transform_type: "math".to_string(),
            map: Some(MapTransform::new([("a", "b")])),
            ..TransformSpec::default()
        };
        assert_eq!(
            Transform::try_from(spec).err(),
            Some(Error::config_missing("math"))
        );

        let decoded: std::result::Result<Transform, _> =
            serde_json::from_value(json!({"type": "map"}));
        let message = decoded.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(message.contains("given type map requires configuration"));
    }

    #[test]
    fn test_resolve_wraps_with_transform_name() {
        let err = Transform::math(2).resolve(&[json!("x")]).err();
        assert_eq!(
            err.map(|e| e.to_string()),
            Some(
                "math transform could not resolve: input is required to be a number for math transformer"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_resolve_multiple_tags_index_only_for_several_values() {
        let fail_on_strings = |v: &Value| {
            if v.is_string() {
                Err(Error::NonNumericInput)
            } else {
                Ok(v.clone())
            }
        };
        assert_eq!(
            resolve_multiple(&[json!("a")], fail_on_strings),
            Err(Error::NonNumericInput)
        );
        assert_eq!(
            resolve_multiple(&[json!(1), json!("a")], fail_on_strings),
            Err(Error::resolve_at_index(1, Error::NonNumericInput))
        );
        assert_eq!(resolve_multiple(&[], fail_on_strings), Err(Error::NoInputValues));
    }
}
