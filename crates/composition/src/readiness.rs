//! Readiness checks over composed documents.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use patchform_fieldpath::Paved;

use crate::error::{Error, Result};
use crate::types::ComposedTemplate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadinessCheckType {
    /// Always ready.
    None,
    /// Ready once the field exists.
    #[default]
    NonEmpty,
    /// Ready once the field equals `matchString`.
    MatchString,
    /// Ready once the field equals `matchInteger`.
    MatchInteger,
}

impl ReadinessCheckType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::NonEmpty => "NonEmpty",
            Self::MatchString => "MatchString",
            Self::MatchInteger => "MatchInteger",
        }
    }
}

impl fmt::Display for ReadinessCheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single condition a composed document must meet to count as ready.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessCheck {
    #[serde(rename = "type")]
    pub check_type: ReadinessCheckType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_path: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub match_string: String,

    #[serde(default)]
    pub match_integer: i64,
}

impl ReadinessCheck {
    pub fn non_empty(field_path: impl Into<String>) -> Self {
        Self {
            field_path: Some(field_path.into()),
            ..Self::default()
        }
    }

    pub fn match_string(field_path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            check_type: ReadinessCheckType::MatchString,
            field_path: Some(field_path.into()),
            match_string: value.into(),
            ..Self::default()
        }
    }

    pub fn match_integer(field_path: impl Into<String>, value: i64) -> Self {
        Self {
            check_type: ReadinessCheckType::MatchInteger,
            field_path: Some(field_path.into()),
            match_integer: value,
            ..Self::default()
        }
    }

    /// Evaluate this check. A missing field is not ready rather than an error.
    ///
    /// # Errors
    ///
    /// Fails if the check needs a field path and has none, or the field
    /// holds a value of the wrong kind.
    pub fn is_ready(&self, composed: &Paved) -> Result<bool> {
        if self.check_type == ReadinessCheckType::None {
            return Ok(true);
        }
        let path = self
            .field_path
            .as_deref()
            .ok_or_else(|| Error::required_field("fieldPath", self.check_type.as_str()))?;
        let outcome = match self.check_type {
            ReadinessCheckType::None => Ok(true),
            ReadinessCheckType::NonEmpty => composed.get_value(path).map(|_| true),
            ReadinessCheckType::MatchString => composed
                .get_string(path)
                .map(|value| value == self.match_string),
            ReadinessCheckType::MatchInteger => composed
                .get_integer(path)
                .map(|value| value == self.match_integer),
        };
        match outcome {
            Err(e) if e.is_not_found() => Ok(false),
            other => Ok(other?),
        }
    }
}

/// Whether `composed` passes every check.
///
/// With no checks, a composed document is ready when it reports a `Ready`
/// condition with status `"True"`.
///
/// # Errors
///
/// Returns the first failing check's error tagged with its index.
pub fn is_ready(checks: &[ReadinessCheck], composed: &Paved) -> Result<bool> {
    if checks.is_empty() {
        return Ok(has_ready_condition(composed.object()));
    }
    for (index, check) in checks.iter().enumerate() {
        let ready = check
            .is_ready(composed)
            .map_err(|e| Error::readiness_check_at_index(index, e))?;
        if !ready {
            return Ok(false);
        }
    }
    Ok(true)
}

fn has_ready_condition(document: &Value) -> bool {
    document
        .pointer("/status/conditions")
        .and_then(Value::as_array)
        .is_some_and(|conditions| {
            conditions.iter().any(|c| {
                c.get("type").and_then(Value::as_str) == Some("Ready")
                    && c.get("status").and_then(Value::as_str) == Some("True")
            })
        })
}

impl ComposedTemplate {
    /// Whether `composed` passes this template's readiness checks.
    ///
    /// # Errors
    ///
    /// See [`is_ready`].
    pub fn is_ready(&self, composed: &Paved) -> Result<bool> {
        is_ready(&self.readiness_checks, composed)
    }
}
