//! Patches copy values between a composite and a composed document.
//!
//! Each patch reads one or more source fields, runs the values through its
//! transforms, and writes the single result to a destination field. All
//! reads and transforms complete before anything is written, so a failing
//! patch never leaves a partial write behind.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use patchform_fieldpath::{FieldAccess, from_unstructured, to_unstructured};

use crate::error::{Error, Result};
use crate::transform::{self, Transform};

/// How a patch moves values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PatchType {
    /// Copy one composite field onto the composed document.
    #[default]
    FromCompositeFieldPath,
    /// Combine several composite fields into one composed field.
    FromMultipleCompositeFieldPaths,
    /// Copy one composed field back onto the composite.
    ToCompositeFieldPath,
    /// A reference to a named PatchSet, replaced by inlining.
    PatchSet,
}

impl PatchType {
    pub const ALL: [Self; 4] = [
        Self::FromCompositeFieldPath,
        Self::FromMultipleCompositeFieldPaths,
        Self::ToCompositeFieldPath,
        Self::PatchSet,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FromCompositeFieldPath => "FromCompositeFieldPath",
            Self::FromMultipleCompositeFieldPaths => "FromMultipleCompositeFieldPaths",
            Self::ToCompositeFieldPath => "ToCompositeFieldPath",
            Self::PatchSet => "PatchSet",
        }
    }
}

impl fmt::Display for PatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatchType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::invalid_patch_type(s))
    }
}

impl TryFrom<String> for PatchType {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<PatchType> for String {
    fn from(patch_type: PatchType) -> Self {
        patch_type.as_str().to_string()
    }
}

/// A single patch between a composite and a composed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    #[serde(rename = "type", default)]
    pub patch_type: PatchType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_field_path: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub from_multiple_field_paths: Vec<String>,

    /// Defaults to `from_field_path` for the single-source patch types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_field_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_set_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<Transform>,
}

impl Patch {
    /// A `FromCompositeFieldPath` patch reading `path`.
    pub fn from_composite(path: impl Into<String>) -> Self {
        Self {
            from_field_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// A `ToCompositeFieldPath` patch reading `path` on the composed document.
    pub fn to_composite(path: impl Into<String>) -> Self {
        Self {
            patch_type: PatchType::ToCompositeFieldPath,
            from_field_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// A `FromMultipleCompositeFieldPaths` patch writing to `to`.
    pub fn from_multiple<I, S>(paths: I, to: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patch_type: PatchType::FromMultipleCompositeFieldPaths,
            from_multiple_field_paths: paths.into_iter().map(Into::into).collect(),
            to_field_path: Some(to.into()),
            ..Self::default()
        }
    }

    /// A reference to the PatchSet called `name`.
    pub fn patch_set(name: impl Into<String>) -> Self {
        Self {
            patch_type: PatchType::PatchSet,
            patch_set_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Set the destination field path.
    #[must_use]
    pub fn to(mut self, path: impl Into<String>) -> Self {
        self.to_field_path = Some(path.into());
        self
    }

    /// Set the transforms run on the source values.
    #[must_use]
    pub fn with_transforms(mut self, transforms: impl IntoIterator<Item = Transform>) -> Self {
        self.transforms = transforms.into_iter().collect();
        self
    }

    /// Whether this patch writes to the composite rather than the composed document.
    pub const fn writes_composite(&self) -> bool {
        matches!(self.patch_type, PatchType::ToCompositeFieldPath)
    }

    /// Apply this patch between `composite` and `composed`.
    ///
    /// When `only` is non-empty, patches of other types are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a field required by the patch type is unset, a
    /// path is malformed, a transform fails, or the patch is an uninlined
    /// PatchSet reference.
    pub fn apply<C, R>(&self, composite: &mut C, composed: &mut R, only: &[PatchType]) -> Result<()>
    where
        C: FieldAccess + ?Sized,
        R: FieldAccess + ?Sized,
    {
        if !only.is_empty() && !only.contains(&self.patch_type) {
            debug!(patch_type = %self.patch_type, "Patch type filtered out, skipping");
            return Ok(());
        }

        match self.patch_type {
            PatchType::FromCompositeFieldPath => self.apply_from_field_path(&*composite, composed),
            PatchType::ToCompositeFieldPath => self.apply_from_field_path(&*composed, composite),
            PatchType::FromMultipleCompositeFieldPaths => {
                self.apply_from_multiple_field_paths(&*composite, composed)
            }
            PatchType::PatchSet => Err(Error::invalid_patch_type(self.patch_type.as_str())),
        }
    }

    /// Apply this patch between typed objects through their unstructured form.
    ///
    /// Only the destination object is replaced, and only once the patch has
    /// succeeded and the patched document converts back.
    ///
    /// # Errors
    ///
    /// Returns an error if either object cannot be converted, or if
    /// [`Patch::apply`] fails.
    pub fn apply_typed<C, R>(&self, composite: &mut C, composed: &mut R, only: &[PatchType]) -> Result<()>
    where
        C: Serialize + DeserializeOwned,
        R: Serialize + DeserializeOwned,
    {
        let mut composite_doc = to_unstructured(&*composite)?;
        let mut composed_doc = to_unstructured(&*composed)?;
        self.apply(&mut composite_doc, &mut composed_doc, only)?;
        if self.writes_composite() {
            *composite = from_unstructured(composite_doc)?;
        } else {
            *composed = from_unstructured(composed_doc)?;
        }
        Ok(())
    }

    fn apply_from_field_path<F, T>(&self, from: &F, to: &mut T) -> Result<()>
    where
        F: FieldAccess + ?Sized,
        T: FieldAccess + ?Sized,
    {
        let from_path = self
            .from_field_path
            .as_deref()
            .ok_or_else(|| Error::required_field("fromFieldPath", self.patch_type.as_str()))?;
        let to_path = self.to_field_path.as_deref().unwrap_or(from_path);

        let Some(input) = from.get_path(from_path)? else {
            debug!(from = from_path, "Source field not found, skipping patch");
            return Ok(());
        };

        let output = transform::run(&self.transforms, vec![input])?;
        debug!(
            patch_type = %self.patch_type,
            from = from_path,
            to = to_path,
            "Applying patch"
        );
        to.set_path(to_path, output)?;
        Ok(())
    }

    fn apply_from_multiple_field_paths<F, T>(&self, from: &F, to: &mut T) -> Result<()>
    where
        F: FieldAccess + ?Sized,
        T: FieldAccess + ?Sized,
    {
        if self.from_multiple_field_paths.is_empty() {
            return Err(Error::required_field(
                "fromMultipleFieldPaths",
                self.patch_type.as_str(),
            ));
        }
        let to_path = self
            .to_field_path
            .as_deref()
            .ok_or_else(|| Error::required_field("toFieldPath", self.patch_type.as_str()))?;

        let mut inputs: Vec<Value> = Vec::with_capacity(self.from_multiple_field_paths.len());
        for path in &self.from_multiple_field_paths {
            match from.get_path(path)? {
                Some(value) => inputs.push(value),
                None => {
                    debug!(from = path.as_str(), "Source field not found, skipping patch");
                    return Ok(());
                }
            }
        }

        let output = transform::run(&self.transforms, inputs)?;
        debug!(
            patch_type = %self.patch_type,
            sources = self.from_multiple_field_paths.len(),
            to = to_path,
            "Applying patch"
        );
        to.set_path(to_path, output)?;
        Ok(())
    }
}
