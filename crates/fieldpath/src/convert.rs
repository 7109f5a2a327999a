//! Conversion between typed objects and their unstructured form.
//!
//! Patches operate on `serde_json::Value` documents. Any concretely typed
//! object that round-trips through serde can be viewed as such a document
//! and rebuilt from it afterwards.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// View a typed object as an unstructured document.
pub fn to_unstructured<T: Serialize>(object: &T) -> Result<Value> {
    serde_json::to_value(object).map_err(|e| Error::conversion(e.to_string()))
}

/// Rebuild a typed object from an unstructured document.
pub fn from_unstructured<T: DeserializeOwned>(document: Value) -> Result<T> {
    serde_json::from_value(document).map_err(|e| Error::conversion(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Bucket {
        storage_class: String,
        replicas: u32,
    }

    #[test]
    fn test_round_trip() -> Result<()> {
        let bucket = Bucket {
            storage_class: "cold".to_string(),
            replicas: 2,
        };
        let doc = to_unstructured(&bucket)?;
        assert_eq!(doc, json!({"storageClass": "cold", "replicas": 2}));
        let back: Bucket = from_unstructured(doc)?;
        assert_eq!(back, bucket);
        Ok(())
    }

    #[test]
    fn test_from_unstructured_shape_mismatch() {
        let result: Result<Bucket> = from_unstructured(json!({"storageClass": 3}));
        assert!(matches!(result, Err(Error::Conversion { .. })));
    }
}
