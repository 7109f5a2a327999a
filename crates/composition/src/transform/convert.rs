//! Conversion between the four scalar kinds.
//!
//! Conversions are looked up in a fixed table indexed by source and target
//! [`Kind`]. The diagonal is empty because a value that already has the
//! target kind is passed through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::resolve_multiple;
use crate::error::{Error, Result};
use crate::value::{Kind, kind_name};

/// A conversion of one scalar value to another kind.
pub type Conversion = fn(&Value) -> Result<Value>;

/// Rows are source kinds, columns target kinds, both in [`Kind::ALL`] order.
static CONVERSIONS: [[Option<Conversion>; 4]; 4] = [
    // from string
    [
        None,
        Some(string_to_int),
        Some(string_to_bool),
        Some(string_to_float),
    ],
    // from int
    [
        Some(int_to_string),
        None,
        Some(int_to_bool),
        Some(int_to_float),
    ],
    // from bool
    [
        Some(bool_to_string),
        Some(bool_to_int),
        None,
        Some(bool_to_float),
    ],
    // from float64
    [
        Some(float_to_string),
        Some(float_to_int),
        Some(float_to_bool),
        None,
    ],
];

/// Converts each input to a target kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertTransform {
    #[serde(rename = "toType")]
    pub to_type: Kind,
}

impl ConvertTransform {
    pub const fn new(to_type: Kind) -> Self {
        Self { to_type }
    }

    pub fn resolve(&self, values: &[Value]) -> Result<Vec<Value>> {
        resolve_multiple(values, |value| convert(value, self.to_type))
    }
}

/// The conversion from `from` to `to`, if the pair is defined.
pub fn conversion_for(from: Kind, to: Kind) -> Option<Conversion> {
    CONVERSIONS
        .get(from.ordinal())
        .and_then(|row| row.get(to.ordinal()))
        .copied()
        .flatten()
}

/// Convert a single value to `to`.
pub fn convert(value: &Value, to: Kind) -> Result<Value> {
    let from = Kind::of(value).ok_or_else(|| unsupported(value))?;
    if from == to {
        return Ok(value.clone());
    }
    let conversion = conversion_for(from, to).ok_or(Error::UnsupportedConversionPair { from, to })?;
    conversion(value)
}

fn unsupported(value: &Value) -> Error {
    Error::UnsupportedInputKind {
        kind: kind_name(value),
    }
}

fn as_str(value: &Value) -> Result<&str> {
    value.as_str().ok_or_else(|| unsupported(value))
}

fn as_int(value: &Value) -> Result<i64> {
    value.as_i64().ok_or_else(|| unsupported(value))
}

fn as_bool(value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| unsupported(value))
}

fn as_float(value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| unsupported(value))
}

fn string_to_int(value: &Value) -> Result<Value> {
    let s = as_str(value)?;
    s.parse::<i64>()
        .map(Value::from)
        .map_err(|e| Error::parse_failed(s, Kind::Int, e.to_string()))
}

fn string_to_bool(value: &Value) -> Result<Value> {
    let s = as_str(value)?;
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(Value::Bool(true)),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(Value::Bool(false)),
        _ => Err(Error::parse_failed(s, Kind::Bool, "invalid syntax")),
    }
}

fn string_to_float(value: &Value) -> Result<Value> {
    let s = as_str(value)?;
    let parsed = s
        .parse::<f64>()
        .map_err(|e| Error::parse_failed(s, Kind::Float64, e.to_string()))?;
    Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(|| Error::parse_failed(s, Kind::Float64, "value is not finite"))
}

fn int_to_string(value: &Value) -> Result<Value> {
    as_int(value).map(|i| Value::String(i.to_string()))
}

fn int_to_bool(value: &Value) -> Result<Value> {
    as_int(value).map(|i| Value::Bool(i == 1))
}

#[allow(clippy::cast_precision_loss)]
fn int_to_float(value: &Value) -> Result<Value> {
    as_int(value).map(|i| Value::from(i as f64))
}

fn bool_to_string(value: &Value) -> Result<Value> {
    as_bool(value).map(|b| Value::String(b.to_string()))
}

fn bool_to_int(value: &Value) -> Result<Value> {
    as_bool(value).map(|b| Value::from(i64::from(b)))
}

fn bool_to_float(value: &Value) -> Result<Value> {
    as_bool(value).map(|b| Value::from(if b { 1.0 } else { 0.0 }))
}

fn float_to_string(value: &Value) -> Result<Value> {
    as_float(value).map(|f| Value::String(f.to_string()))
}

// Truncates toward zero, saturating at the i64 bounds.
#[allow(clippy::cast_possible_truncation)]
fn float_to_int(value: &Value) -> Result<Value> {
    as_float(value).map(|f| Value::from(f as i64))
}

#[allow(clippy::float_cmp)]
fn float_to_bool(value: &Value) -> Result<Value> {
    as_float(value).map(|f| Value::Bool(f == 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use serde_json::json;

    #[test]
    fn test_table_defines_every_cross_kind_pair() {
        for from in Kind::ALL {
            for to in Kind::ALL {
                assert_eq!(conversion_for(from, to).is_some(), from != to, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_same_kind_passes_through() {
        assert_eq!(convert(&json!("a"), Kind::String), Ok(json!("a")));
        assert_eq!(convert(&json!(7), Kind::Int), Ok(json!(7)));
    }

    #[test]
    fn test_string_conversions() {
        assert_eq!(convert(&json!("42"), Kind::Int), Ok(json!(42)));
        assert_eq!(convert(&json!("-7"), Kind::Int), Ok(json!(-7)));
        assert_eq!(convert(&json!("T"), Kind::Bool), Ok(json!(true)));
        assert_eq!(convert(&json!("0"), Kind::Bool), Ok(json!(false)));
        assert_eq!(convert(&json!("2.5"), Kind::Float64), Ok(json!(2.5)));
    }

    #[test]
    fn test_string_parse_failures() {
        for (input, to) in [
            ("abc", Kind::Int),
            ("1.5", Kind::Int),
            ("yes", Kind::Bool),
            ("x1", Kind::Float64),
            ("inf", Kind::Float64),
            ("NaN", Kind::Float64),
        ] {
            let result = convert(&json!(input), to);
            assert!(
                matches!(&result, Err(Error::ParseFailed { target, .. }) if *target == to),
                "{input} -> {to}: {result:?}"
            );
            assert_eq!(result.map_err(|e| e.class()), Err(ErrorClass::Resolution));
        }
    }

    #[test]
    fn test_numeric_and_boolean_conversions() {
        assert_eq!(convert(&json!(true), Kind::Int), Ok(json!(1)));
        assert_eq!(convert(&json!(false), Kind::Int), Ok(json!(0)));
        assert_eq!(convert(&json!(1), Kind::Bool), Ok(json!(true)));
        assert_eq!(convert(&json!(2), Kind::Bool), Ok(json!(false)));
        assert_eq!(convert(&json!(true), Kind::Float64), Ok(json!(1.0)));
        assert_eq!(convert(&json!(1.0), Kind::Bool), Ok(json!(true)));
        assert_eq!(convert(&json!(0.5), Kind::Bool), Ok(json!(false)));
        assert_eq!(convert(&json!(3), Kind::Float64), Ok(json!(3.0)));
        assert_eq!(convert(&json!(-2.9), Kind::Int), Ok(json!(-2)));
        assert_eq!(convert(&json!(1e300), Kind::Int), Ok(json!(i64::MAX)));
    }

    #[test]
    fn test_formatting_conversions() {
        assert_eq!(convert(&json!(12), Kind::String), Ok(json!("12")));
        assert_eq!(convert(&json!(false), Kind::String), Ok(json!("false")));
        assert_eq!(convert(&json!(2.5), Kind::String), Ok(json!("2.5")));
        assert_eq!(convert(&json!(3.0), Kind::String), Ok(json!("3")));
    }

    #[test]
    fn test_unsupported_input_kinds() {
        assert_eq!(
            convert(&json!(null), Kind::String),
            Err(Error::UnsupportedInputKind { kind: "null" })
        );
        assert_eq!(
            convert(&json!([1]), Kind::Int),
            Err(Error::UnsupportedInputKind { kind: "array" })
        );
        assert_eq!(
            convert(&json!(u64::MAX), Kind::String),
            Err(Error::UnsupportedInputKind { kind: "uint64" })
        );
    }
}
