//! PatchSet inlining.
//!
//! Templates may reference a named [`PatchSet`](crate::types::PatchSet)
//! with a patch of type `PatchSet`. Inlining splices the referenced patches
//! into the template in place of the reference, so the patch engine only
//! ever sees concrete patches.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::patch::{Patch, PatchType};
use crate::types::CompositionSpec;

type PatchSetIndex<'a> = HashMap<&'a str, &'a [Patch]>;

impl CompositionSpec {
    /// Replace every PatchSet reference in every template with the patches
    /// of the referenced set.
    ///
    /// Either every template is updated or, on error, none is. Running it
    /// again is a no-op.
    ///
    /// # Errors
    ///
    /// Fails if a PatchSet contains a PatchSet reference, a reference has no
    /// name, or a reference names an undefined PatchSet.
    pub fn inline_patch_sets(&mut self) -> Result<()> {
        let resolved = self.template_patches()?;
        for (template, patches) in self.resources.iter_mut().zip(resolved) {
            template.patches = patches;
        }
        debug!(
            patch_sets = self.patch_sets.len(),
            templates = self.resources.len(),
            "Inlined PatchSets"
        );
        Ok(())
    }

    /// Each template's patches with PatchSet references inlined, in
    /// template order.
    ///
    /// # Errors
    ///
    /// See [`CompositionSpec::inline_patch_sets`].
    pub fn template_patches(&self) -> Result<Vec<Vec<Patch>>> {
        let index = self.patch_set_index()?;
        self.resources
            .iter()
            .map(|template| inline_patches(&template.patches, &index))
            .collect()
    }

    fn patch_set_index(&self) -> Result<PatchSetIndex<'_>> {
        self.patch_sets
            .iter()
            .map(|set| {
                if set.patches.iter().any(|p| p.patch_type == PatchType::PatchSet) {
                    return Err(Error::nested_patch_set(set.name.as_str()));
                }
                Ok((set.name.as_str(), set.patches.as_slice()))
            })
            .collect()
    }
}

fn inline_patches(patches: &[Patch], index: &PatchSetIndex<'_>) -> Result<Vec<Patch>> {
    let mut inlined = Vec::with_capacity(patches.len());
    for patch in patches {
        if patch.patch_type != PatchType::PatchSet {
            inlined.push(patch.clone());
            continue;
        }
        let name = patch
            .patch_set_name
            .as_deref()
            .ok_or_else(|| Error::required_field("patchSetName", PatchType::PatchSet.as_str()))?;
        let set = index
            .get(name)
            .ok_or_else(|| Error::undefined_patch_set(name))?;
        inlined.extend(set.iter().cloned());
    }
    Ok(inlined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use crate::types::{ComposedTemplate, PatchSet};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn spec(patch_sets: Vec<PatchSet>, templates: Vec<Vec<Patch>>) -> CompositionSpec {
        CompositionSpec {
            patch_sets,
            resources: templates
                .into_iter()
                .map(|patches| ComposedTemplate::new(json!({})).with_patches(patches))
                .collect(),
            ..CompositionSpec::default()
        }
    }

    #[test]
    fn test_splices_patch_set_in_place() -> Result<()> {
        let p1 = Patch::from_composite("spec.a");
        let p2 = Patch::from_composite("spec.b");
        let p3 = Patch::from_composite("spec.c");
        let mut spec = spec(
            vec![PatchSet::new("a", [p1.clone(), p2.clone()])],
            vec![vec![Patch::patch_set("a"), p3.clone()]],
        );
        spec.inline_patch_sets()?;
        assert_eq!(spec.template_patches()?, vec![vec![p1, p2, p3]]);
        Ok(())
    }

    #[test]
    fn test_reference_in_the_middle_keeps_order() -> Result<()> {
        let before = Patch::from_composite("spec.before");
        let inner = Patch::to_composite("status.id");
        let after = Patch::from_composite("spec.after");
        let spec = spec(
            vec![PatchSet::new("set", [inner.clone()])],
            vec![
                vec![before.clone(), Patch::patch_set("set"), after.clone()],
                vec![Patch::patch_set("set"), Patch::patch_set("set")],
            ],
        );
        assert_eq!(
            spec.template_patches()?,
            vec![vec![before, inner.clone(), after], vec![inner.clone(), inner]]
        );
        Ok(())
    }

    #[test]
    fn test_nested_patch_set_is_rejected() {
        let mut spec = spec(
            vec![
                PatchSet::new("inner", [Patch::from_composite("spec.a")]),
                PatchSet::new("outer", [Patch::patch_set("inner")]),
            ],
            vec![],
        );
        let result = spec.inline_patch_sets();
        assert_eq!(result, Err(Error::nested_patch_set("outer")));
        assert_eq!(result.map_err(|e| e.class()), Err(ErrorClass::Validation));
    }

    #[test]
    fn test_nested_patch_set_is_rejected_even_when_unreferenced() {
        let spec = spec(
            vec![PatchSet::new("bad", [Patch::patch_set("bad")])],
            vec![vec![Patch::from_composite("spec.a")]],
        );
        assert_eq!(spec.template_patches(), Err(Error::nested_patch_set("bad")));
    }

    #[test]
    fn test_undefined_and_unnamed_references() {
        let undefined = spec(vec![], vec![vec![Patch::patch_set("missing")]]);
        assert_eq!(
            undefined.template_patches(),
            Err(Error::undefined_patch_set("missing"))
        );

        let unnamed = spec(
            vec![],
            vec![vec![Patch {
                patch_type: PatchType::PatchSet,
                ..Patch::default()
            }]],
        );
        assert_eq!(
            unnamed.template_patches(),
            Err(Error::required_field("patchSetName", "PatchSet"))
        );
    }

    #[test]
    fn test_failure_leaves_every_template_untouched() {
        let mut spec = spec(
            vec![PatchSet::new("ok", [Patch::from_composite("spec.a")])],
            vec![vec![Patch::patch_set("ok")], vec![Patch::patch_set("missing")]],
        );
        let original = spec.clone();
        assert!(spec.inline_patch_sets().is_err());
        assert_eq!(spec, original);
    }

    #[test]
    fn test_second_run_is_a_no_op() -> Result<()> {
        let mut spec = spec(
            vec![PatchSet::new("a", [Patch::from_composite("spec.a")])],
            vec![vec![Patch::patch_set("a")]],
        );
        spec.inline_patch_sets()?;
        let once = spec.clone();
        spec.inline_patch_sets()?;
        assert_eq!(spec, once);
        Ok(())
    }
}
