//! Rendering composed documents from their templates.

use serde_json::{Value, json};
use tracing::debug;

use patchform_fieldpath::FieldAccess;

use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::types::ComposedTemplate;

/// Replace `composed` with `base`, keeping the existing name and namespace.
///
/// If `composed` already declares an API version or kind, `base` must
/// declare the same ones. On error `composed` is left untouched.
///
/// # Errors
///
/// Returns [`Error::KindChanged`] if the base would change the composed
/// document's type, or a document error if `base` is not an object.
pub fn render_from_base(composed: &mut Value, base: &Value) -> Result<()> {
    if !base.is_object() {
        return Err(patchform_fieldpath::Error::not_an_object("base").into());
    }

    let existing = type_of(composed);
    let rendered = type_of(base);
    if existing != ("", "") && existing != rendered {
        return Err(Error::kind_changed(describe(existing), describe(rendered)));
    }

    let mut next = base.clone();
    for field in ["name", "namespace"] {
        if let Some(value) = composed.pointer(&format!("/metadata/{field}")).cloned() {
            next.set_path(&format!("metadata.{field}"), value)?;
        }
    }
    *composed = next;
    Ok(())
}

fn type_of(document: &Value) -> (&str, &str) {
    (str_field(document, "apiVersion"), str_field(document, "kind"))
}

fn str_field<'a>(document: &'a Value, name: &str) -> &'a str {
    document.get(name).and_then(Value::as_str).unwrap_or_default()
}

fn describe((api_version, kind): (&str, &str)) -> String {
    format!("{api_version}, Kind={kind}")
}

/// Composite label holding the name prefix of its composed resources.
pub const LABEL_COMPOSITE: &str = "crossplane.io/composite";

/// Composite label naming the claim it was created for.
pub const LABEL_CLAIM_NAME: &str = "crossplane.io/claim-name";

/// Composite label naming the claim's namespace.
pub const LABEL_CLAIM_NAMESPACE: &str = "crossplane.io/claim-namespace";

/// Composed annotation naming the template a resource was rendered from.
pub const ANNOTATION_RESOURCE_NAME: &str = "crossplane.io/composition-resource-name";

/// Render the metadata tying `composed` to its `composite`.
///
/// Sets `generateName` to `<prefix>-` from the composite's
/// [`LABEL_COMPOSITE`] label, copies the composite and claim labels the
/// composite carries, records `resource_name` as an annotation, and makes
/// the composite the controller of `composed`. An owner reference with the
/// composite's UID is replaced; any other owner reference is kept.
///
/// # Errors
///
/// Returns [`Error::ControllerConflict`] if `composed` is already
/// controlled by a different UID, leaving `composed` untouched. Fails with
/// a document error if the composite's metadata has the wrong shape.
pub fn render_composed_metadata<C>(
    composed: &mut Value,
    composite: &C,
    resource_name: Option<&str>,
) -> Result<()>
where
    C: FieldAccess + ?Sized,
{
    let uid = string_at(composite, "metadata.uid")?.unwrap_or_default();
    let reference = json!({
        "apiVersion": string_at(composite, "apiVersion")?.unwrap_or_default(),
        "kind": string_at(composite, "kind")?.unwrap_or_default(),
        "name": string_at(composite, "metadata.name")?.unwrap_or_default(),
        "uid": uid,
        "controller": true,
        "blockOwnerDeletion": true,
    });

    let mut references = composed
        .pointer("/metadata/ownerReferences")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if let Some(controller) = references
        .iter()
        .find(|r| is_controller(r) && str_field(r, "uid") != uid)
    {
        return Err(Error::controller_conflict(
            composed.pointer("/metadata/name").and_then(Value::as_str).unwrap_or_default(),
            str_field(controller, "kind"),
            str_field(controller, "name"),
            str_field(controller, "uid"),
        ));
    }
    match references.iter_mut().find(|r| str_field(r, "uid") == uid) {
        Some(existing) => *existing = reference,
        None => references.push(reference),
    }

    let mut next = composed.clone();
    if let Some(prefix) = string_at(composite, &label_path(LABEL_COMPOSITE))? {
        next.set_path("metadata.generateName", Value::String(format!("{prefix}-")))?;
    }
    for key in [LABEL_COMPOSITE, LABEL_CLAIM_NAME, LABEL_CLAIM_NAMESPACE] {
        if let Some(value) = string_at(composite, &label_path(key))? {
            next.set_path(&label_path(key), Value::String(value))?;
        }
    }
    if let Some(name) = resource_name {
        next.set_path(
            &format!("metadata.annotations[{ANNOTATION_RESOURCE_NAME}]"),
            Value::String(name.to_string()),
        )?;
    }
    next.set_path("metadata.ownerReferences", Value::Array(references))?;
    *composed = next;
    Ok(())
}

fn is_controller(reference: &Value) -> bool {
    reference.get("controller").and_then(Value::as_bool) == Some(true)
}

fn label_path(key: &str) -> String {
    format!("metadata.labels[{key}]")
}

fn string_at<C>(document: &C, path: &str) -> Result<Option<String>>
where
    C: FieldAccess + ?Sized,
{
    Ok(document
        .get_path(path)?
        .and_then(|value| value.as_str().map(str::to_string)))
}

impl ComposedTemplate {
    /// Render the base and the composite's metadata, then apply this
    /// template's patches in order.
    ///
    /// The template's patches must already be inlined.
    ///
    /// # Errors
    ///
    /// Returns the base or metadata rendering error, or the first patch
    /// error tagged with the patch's index.
    pub fn render<C>(&self, composite: &mut C, composed: &mut Value, config: &RenderConfig) -> Result<()>
    where
        C: FieldAccess + ?Sized,
    {
        render_from_base(composed, &self.base)?;
        render_composed_metadata(composed, &*composite, self.name.as_deref())?;
        for (index, patch) in self.patches.iter().enumerate() {
            patch
                .apply(composite, composed, config.patch_types())
                .map_err(|e| Error::patch_at_index(index, e))?;
        }
        debug!(
            template = self.name.as_deref().unwrap_or_default(),
            patches = self.patches.len(),
            "Rendered composed resource"
        );
        Ok(())
    }
}
