//! Loading declarative documents from disk.
//!
//! The format is chosen from the file extension: `.json` is JSON, `.toml` is
//! TOML, and everything else is treated as YAML (a superset of JSON for the
//! documents we care about).

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;
use crate::result::{Result, ResultExt};

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Pick a format from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Decode a document held in memory.
pub fn parse<T: DeserializeOwned>(content: &str, format: Format) -> Result<T> {
    if content.trim().is_empty() {
        return Err(Error::invalid_document("document is empty"));
    }
    match format {
        Format::Json => {
            serde_json::from_str(content).map_err(|e| Error::json_parse_failed(e.to_string()))
        }
        Format::Yaml => {
            serde_yaml::from_str(content).map_err(|e| Error::yaml_parse_failed(e.to_string()))
        }
        Format::Toml => toml::from_str(content).map_err(|e| Error::toml_parse_failed(e.to_string())),
    }
}

/// Read and decode a document from a file.
pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::file_read_failed(path, e.to_string()))?;
    let format = Format::from_path(path);
    debug!(path = %path.display(), ?format, "Loading document");
    parse(&content, format).inspect_error(|e| {
        debug!(path = %path.display(), error = %e, "Document failed to decode");
    })
}
