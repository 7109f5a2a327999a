//! Scalar kinds of values flowing through a transform chain.
//!
//! Documents hold arbitrary JSON, but the transforms only understand four
//! scalar kinds. Every integer width is normalised to [`Kind::Int`] (a signed
//! 64-bit integer); unsigned values above `i64::MAX` fall outside the model.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of scalar kinds understood by the transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    String,
    Int,
    Bool,
    Float64,
}

impl Kind {
    /// All kinds, in conversion-table order.
    pub const ALL: [Self; 4] = [Self::String, Self::Int, Self::Bool, Self::Float64];

    /// The kind's wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Float64 => "float64",
        }
    }

    /// Position of this kind in [`Kind::ALL`].
    pub(crate) const fn ordinal(self) -> usize {
        match self {
            Self::String => 0,
            Self::Int => 1,
            Self::Bool => 2,
            Self::Float64 => 3,
        }
    }

    /// Classify a value, or `None` if it is not one of the four scalar kinds.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(Self::String),
            Value::Bool(_) => Some(Self::Bool),
            Value::Number(n) if n.is_i64() => Some(Self::Int),
            Value::Number(n) if n.is_f64() => Some(Self::Float64),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describe a value's kind for error messages, including non-scalar kinds.
pub fn kind_name(value: &Value) -> &'static str {
    match Kind::of(value) {
        Some(kind) => kind.as_str(),
        None => match value {
            Value::Null => "null",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            _ => "uint64",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of_scalars() {
        assert_eq!(Kind::of(&json!("a")), Some(Kind::String));
        assert_eq!(Kind::of(&json!(true)), Some(Kind::Bool));
        assert_eq!(Kind::of(&json!(-3)), Some(Kind::Int));
        assert_eq!(Kind::of(&json!(42_u32)), Some(Kind::Int));
        assert_eq!(Kind::of(&json!(1.5)), Some(Kind::Float64));
    }

    #[test]
    fn test_kind_of_unsupported() {
        assert_eq!(Kind::of(&json!(null)), None);
        assert_eq!(Kind::of(&json!([1])), None);
        assert_eq!(Kind::of(&json!({"a": 1})), None);
        assert_eq!(Kind::of(&json!(u64::MAX)), None);
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(kind_name(&json!(1)), "int");
        assert_eq!(kind_name(&json!(null)), "null");
        assert_eq!(kind_name(&json!(u64::MAX)), "uint64");
        assert_eq!(kind_name(&json!({})), "object");
    }

    #[test]
    fn test_ordinals_follow_all() {
        for (i, kind) in Kind::ALL.iter().enumerate() {
            assert_eq!(kind.ordinal(), i);
        }
    }

    #[test]
    fn test_wire_names() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_value(Kind::Float64)?, json!("float64"));
        let kind: Kind = serde_json::from_value(json!("int"))?;
        assert_eq!(kind, Kind::Int);
        Ok(())
    }
}
