//! Connection details published by composed resources.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use patchform_fieldpath::Paved;

use crate::error::{Error, Result};

/// Connection details keyed by secret key.
pub type ConnectionDetails = BTreeMap<String, Vec<u8>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionDetailType {
    /// Copy a key of the composed resource's connection secret.
    FromConnectionSecretKey,
    /// Read a field of the composed resource.
    FromFieldPath,
    /// Publish a fixed value.
    Value,
}

impl ConnectionDetailType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FromConnectionSecretKey => "FromConnectionSecretKey",
            Self::FromFieldPath => "FromFieldPath",
            Self::Value => "Value",
        }
    }
}

impl fmt::Display for ConnectionDetailType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One connection detail to publish for a composed resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetail {
    /// Output key. Defaults to `fromConnectionSecretKey` for that type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Inferred from the populated fields when unset.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub detail_type: Option<ConnectionDetailType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_connection_secret_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_field_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ConnectionDetail {
    pub fn from_secret_key(key: impl Into<String>) -> Self {
        Self {
            from_connection_secret_key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn from_field_path(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            from_field_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The declared type, or the one implied by the populated fields.
    pub const fn effective_type(&self) -> ConnectionDetailType {
        match (self.detail_type, &self.value, &self.from_field_path) {
            (Some(t), _, _) => t,
            (None, Some(_), _) => ConnectionDetailType::Value,
            (None, None, Some(_)) => ConnectionDetailType::FromFieldPath,
            (None, None, None) => ConnectionDetailType::FromConnectionSecretKey,
        }
    }

    /// The key and value this detail contributes, if any.
    fn extract(&self, composed: &Paved, secret_data: &ConnectionDetails) -> Result<Option<(String, Vec<u8>)>> {
        let detail_type = self.effective_type();
        let required = |field: &'static str| Error::required_field(field, detail_type.as_str());

        match detail_type {
            ConnectionDetailType::Value => {
                let name = self.name.as_deref().ok_or_else(|| required("name"))?;
                let value = self.value.as_deref().ok_or_else(|| required("value"))?;
                Ok(Some((name.to_string(), value.as_bytes().to_vec())))
            }
            ConnectionDetailType::FromConnectionSecretKey => {
                let key = self
                    .from_connection_secret_key
                    .as_deref()
                    .ok_or_else(|| required("fromConnectionSecretKey"))?;
                let name = self.name.as_deref().unwrap_or(key);
                Ok(secret_data.get(key).map(|data| (name.to_string(), data.clone())))
            }
            ConnectionDetailType::FromFieldPath => {
                let path = self
                    .from_field_path
                    .as_deref()
                    .ok_or_else(|| required("fromFieldPath"))?;
                let name = self.name.as_deref().ok_or_else(|| required("name"))?;
                match composed.get_value(path) {
                    Ok(value) => Ok(Some((name.to_string(), to_bytes(&value)?))),
                    Err(e) if e.is_not_found() => Ok(None),
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}

fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::String(s) => Ok(s.as_bytes().to_vec()),
        other => serde_json::to_vec(other)
            .map_err(|e| patchform_fieldpath::Error::conversion(e.to_string()).into()),
    }
}

/// Collect the connection details of a composed resource.
///
/// `secret_data` is the composed resource's own connection secret. Absent
/// secret keys and absent fields are skipped.
///
/// # Errors
///
/// Fails if a detail lacks a field its type requires, or a field path is
/// malformed. The error is tagged with the detail's index.
pub fn extract_connection_details(
    composed: &Paved,
    secret_data: &ConnectionDetails,
    details: &[ConnectionDetail],
) -> Result<ConnectionDetails> {
    let mut out = ConnectionDetails::new();
    for (index, detail) in details.iter().enumerate() {
        let extracted = detail
            .extract(composed, secret_data)
            .map_err(|e| Error::connection_detail_at_index(index, e))?;
        if let Some((key, value)) = extracted {
            out.insert(key, value);
        }
    }
    Ok(out)
}
