//! Render configuration.
//!
//! Selects which patch types a render pass applies. Creation-time passes
//! typically apply only `FromCompositeFieldPath` patches, while status
//! syncs apply only `ToCompositeFieldPath` ones.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use patchform_core::ResultExt;
use patchform_core::document;

use crate::error::Result;
use crate::patch::PatchType;

/// Environment variable holding a comma separated list of patch types.
pub const ENV_PATCH_TYPES: &str = "PATCHFORM_PATCH_TYPES";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    /// Patch types to apply. Empty applies every type.
    #[serde(default)]
    pub patch_types: Vec<PatchType>,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also apply patches of `patch_type`.
    #[must_use]
    pub fn with_patch_type(mut self, patch_type: PatchType) -> Self {
        if !self.patch_types.contains(&patch_type) {
            self.patch_types.push(patch_type);
        }
        self
    }

    /// The selected patch types, empty meaning all.
    pub fn patch_types(&self) -> &[PatchType] {
        &self.patch_types
    }

    /// Read the configuration from `PATCHFORM_PATCH_TYPES`.
    ///
    /// Unknown patch type names are skipped with a warning.
    pub fn from_env() -> Self {
        std::env::var(ENV_PATCH_TYPES)
            .map(|value| Self::from_list(&value))
            .unwrap_or_default()
    }

    /// Parse a comma separated list of patch type names.
    pub fn from_list(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .filter_map(|name| {
                name.parse::<PatchType>()
                    .inspect_err(|e| warn!(error = %e, "Ignoring unknown patch type"))
                    .ok()
            })
            .fold(Self::default(), Self::with_patch_type)
    }

    /// Load the configuration from a JSON, TOML or YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(document::load(path)?)
    }

    /// Load the configuration from a file, falling back to the default.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        document::load(path).or_default_logged(Self::default())
    }
}
