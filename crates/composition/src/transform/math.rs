//! The math resolver.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::resolve_multiple;
use crate::error::{Error, Result};

/// Multiplies integer inputs by a fixed factor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathTransform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiply: Option<i64>,
}

impl MathTransform {
    /// A math transform multiplying by `multiplier`.
    pub const fn multiply(multiplier: i64) -> Self {
        Self {
            multiply: Some(multiplier),
        }
    }

    /// Multiply every value.
    ///
    /// # Errors
    ///
    /// Fails without a multiplier, on a non-integer input, or when the
    /// product overflows `i64`.
    pub fn resolve(&self, values: &[Value]) -> Result<Vec<Value>> {
        let multiplier = self.multiply.ok_or(Error::NoMultiplier)?;
        resolve_multiple(values, |value| multiply_one(multiplier, value))
    }
}

fn multiply_one(multiplier: i64, value: &Value) -> Result<Value> {
    let input = value.as_i64().ok_or(Error::NonNumericInput)?;
    input
        .checked_mul(multiplier)
        .map(Value::from)
        .ok_or(Error::MathOverflow {
            value: input,
            multiplier,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multiplies_each_value() {
        let math = MathTransform::multiply(3);
        assert_eq!(math.resolve(&[json!(2), json!(4)]), Ok(vec![json!(6), json!(12)]));
    }

    #[test]
    fn test_rejects_non_integers() {
        let math = MathTransform::multiply(3);
        assert_eq!(math.resolve(&[json!("x")]), Err(Error::NonNumericInput));
        assert_eq!(math.resolve(&[json!(1.5)]), Err(Error::NonNumericInput));
        assert_eq!(
            math.resolve(&[json!(1), json!(true)]),
            Err(Error::resolve_at_index(1, Error::NonNumericInput))
        );
    }

    #[test]
    fn test_requires_multiplier() {
        assert_eq!(
            MathTransform::default().resolve(&[json!(1)]),
            Err(Error::NoMultiplier)
        );
    }

    #[test]
    fn test_overflow_is_an_error() {
        let math = MathTransform::multiply(2);
        assert_eq!(
            math.resolve(&[json!(i64::MAX)]),
            Err(Error::MathOverflow {
                value: i64::MAX,
                multiplier: 2
            })
        );
    }
}
