//! The declarative composition document.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use patchform_core::document::{self, Format};

use crate::connection::ConnectionDetail;
use crate::error::Result;
use crate::patch::Patch;
use crate::readiness::ReadinessCheck;

/// Refers to a type by API version and kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    pub api_version: String,
    pub kind: String,
}

impl TypeReference {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }
}

/// A named, reusable group of patches.
///
/// A PatchSet may not itself contain PatchSet references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSet {
    pub name: String,
    #[serde(default)]
    pub patches: Vec<Patch>,
}

impl PatchSet {
    pub fn new(name: impl Into<String>, patches: impl IntoIterator<Item = Patch>) -> Self {
        Self {
            name: name.into(),
            patches: patches.into_iter().collect(),
        }
    }
}

/// How one composed resource is produced and observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The document patches are applied on top of.
    pub base: Value,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patches: Vec<Patch>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub connection_details: Vec<ConnectionDetail>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub readiness_checks: Vec<ReadinessCheck>,
}

impl ComposedTemplate {
    pub fn new(base: Value) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_patches(mut self, patches: impl IntoIterator<Item = Patch>) -> Self {
        self.patches = patches.into_iter().collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSpec {
    pub composite_type_ref: TypeReference,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patch_sets: Vec<PatchSet>,

    #[serde(default)]
    pub resources: Vec<ComposedTemplate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_connection_secrets_to_namespace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// A composition: the rules deriving composed resources from a composite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: CompositionSpec,
}

impl Composition {
    /// Load a composition from a JSON, TOML or YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(document::load(path)?)
    }

    /// Decode a composition from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is empty or does not decode.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(document::parse(content, Format::Yaml)?)
    }

    /// A copy of this composition with every PatchSet reference inlined.
    ///
    /// # Errors
    ///
    /// Returns the inlining error; `self` is never modified.
    pub fn inlined(&self) -> Result<Self> {
        let mut working = self.clone();
        working.spec.inline_patch_sets()?;
        Ok(working)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorClass};
    use crate::patch::PatchType;
    use crate::transform::Transform;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const COMPOSITION: &str = r#"
apiVersion: apiextensions.example.org/v1
kind: Composition
metadata:
  name: buckets
spec:
  compositeTypeRef:
    apiVersion: example.org/v1
    kind: XBucket
  patchSets:
    - name: common
      patches:
        - fromFieldPath: metadata.labels
  resources:
    - name: bucket
      base:
        apiVersion: storage.example.org/v1
        kind: Bucket
      patches:
        - type: PatchSet
          patchSetName: common
        - fromFieldPath: spec.region
          toFieldPath: spec.forProvider.region
          transforms:
            - type: map
              map:
                us: us-east-1
"#;

    #[test]
    fn test_decode_yaml() -> Result<()> {
        let composition = Composition::from_yaml_str(COMPOSITION)?;
        assert_eq!(composition.metadata.name.as_deref(), Some("buckets"));
        assert_eq!(
            composition.spec.composite_type_ref,
            TypeReference::new("example.org/v1", "XBucket")
        );
        let template = composition.spec.resources.first().cloned().unwrap_or_default();
        assert_eq!(template.name.as_deref(), Some("bucket"));
        assert_eq!(template.base, json!({"apiVersion": "storage.example.org/v1", "kind": "Bucket"}));
        assert_eq!(
            template.patches,
            vec![
                Patch::patch_set("common"),
                Patch::from_composite("spec.region")
                    .to("spec.forProvider.region")
                    .with_transforms([Transform::map([("us", "us-east-1")])]),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_inlined_leaves_original_untouched() -> Result<()> {
        let composition = Composition::from_yaml_str(COMPOSITION)?;
        let inlined = composition.inlined()?;
        let patch_types = |c: &Composition| -> Vec<PatchType> {
            c.spec
                .resources
                .iter()
                .flat_map(|r| r.patches.iter().map(|p| p.patch_type))
                .collect()
        };
        assert_eq!(
            patch_types(&composition),
            vec![PatchType::PatchSet, PatchType::FromCompositeFieldPath]
        );
        assert_eq!(
            patch_types(&inlined),
            vec![PatchType::FromCompositeFieldPath, PatchType::FromCompositeFieldPath]
        );
        Ok(())
    }

    #[test]
    fn test_decode_rejects_unknown_transform() {
        let yaml = COMPOSITION.replace("type: map", "type: reverse");
        let result = Composition::from_yaml_str(&yaml);
        assert!(matches!(&result, Err(Error::Load(e)) if e.is_parse_error()));
        assert_eq!(result.map_err(|e| e.class()), Err(ErrorClass::Document));
    }

    #[test]
    fn test_empty_document() {
        let result = Composition::from_yaml_str("  ");
        assert!(matches!(result, Err(Error::Load(_))));
    }
}
