//! The map resolver.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::resolve_multiple;
use crate::error::{Error, Result};
use crate::value::kind_name;

/// Looks string inputs up in a static table.
///
/// Serialized as the bare map of pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapTransform {
    pub pairs: BTreeMap<String, String>,
}

impl MapTransform {
    /// A map over the given pairs.
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Replace every value with its mapped string.
    ///
    /// # Errors
    ///
    /// Fails on a non-string input or a key missing from the map.
    pub fn resolve(&self, values: &[Value]) -> Result<Vec<Value>> {
        resolve_multiple(values, |value| self.lookup(value))
    }

    fn lookup(&self, value: &Value) -> Result<Value> {
        let Value::String(key) = value else {
            return Err(Error::UnsupportedMapInputType {
                kind: kind_name(value),
            });
        };
        self.pairs
            .get(key)
            .map(|mapped| Value::String(mapped.clone()))
            .ok_or_else(|| Error::key_not_found(key.as_str()))
    }
}
