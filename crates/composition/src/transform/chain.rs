//! The transform chain run by every patch.

use itertools::Itertools;
use serde_json::Value;
use tracing::trace;

use super::Transform;
use crate::error::{Error, Result};

/// Run `values` through `transforms` in order, producing exactly one value.
///
/// Fails with [`Error::CombineRequired`] when more than one value is left
/// after the last transform. A failing step is tagged with its index.
pub fn run(transforms: &[Transform], values: Vec<Value>) -> Result<Value> {
    let mut current = values;
    for (index, transform) in transforms.iter().enumerate() {
        trace!(
            index,
            transform = transform.type_name(),
            inputs = current.len(),
            "Running transform"
        );
        current = transform
            .resolve(&current)
            .map_err(|e| Error::transform_at_index(index, e))?;
    }

    let count = current.len();
    current.into_iter().exactly_one().map_err(|_| {
        if count == 0 {
            Error::NoInputValues
        } else {
            Error::CombineRequired { count }
        }
    })
}
