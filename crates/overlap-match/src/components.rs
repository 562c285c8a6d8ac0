//! Combination-drug decomposition.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::normalize::normalize_drug_name;

/// Separators applied in order; each one splits every fragment left by the previous.
const COMBINATION_SEPARATORS: [&str; 6] = [" & ", " + ", ", ", " with ", " and ", "/"];

static DOSAGE_QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d+(?:\.\d+)?\s*(?:(?:mg|g|mcg|ml)\b|%)").expect("Invalid dosage regex")
});

static DOSAGE_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:tablet|capsule|injection|solution)s?\b").expect("Invalid dosage form regex")
});

/// Ordered, normalized ingredient names of one drug name. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSet(Vec<String>);

impl ComponentSet {
    fn single(name: String) -> Self {
        Self(vec![name])
    }

    pub fn is_combination(&self) -> bool {
        self.0.len() > 1
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

fn split_fragments(lowered: &str) -> Vec<String> {
    let mut fragments = vec![lowered.to_string()];
    for separator in COMBINATION_SEPARATORS {
        fragments = fragments
            .iter()
            .flat_map(|fragment| fragment.split(separator))
            .map(str::to_string)
            .collect();
    }
    fragments
        .into_iter()
        .map(|fragment| fragment.trim().to_string())
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

fn clean_component(fragment: &str) -> String {
    let without_dose = DOSAGE_QUANTITY.replace_all(fragment, "");
    let without_form = DOSAGE_FORM.replace_all(&without_dose, "");
    normalize_drug_name(without_form.trim())
}

/// Split a drug name into its active ingredients.
///
/// A single surviving fragment yields the normalized whole name, without
/// dosage stripping. A combination whose fragments are all dosage noise also
/// falls back to the whole name so the set is never empty.
pub fn extract_active_ingredients(name: &str) -> ComponentSet {
    let lowered = name.to_lowercase();
    let fragments = split_fragments(&lowered);

    if fragments.len() > 1 {
        let cleaned: Vec<String> = fragments
            .iter()
            .map(|fragment| clean_component(fragment))
            .filter(|component| !component.is_empty())
            .collect();
        if !cleaned.is_empty() {
            return ComponentSet(cleaned);
        }
    }

    ComponentSet::single(normalize_drug_name(&lowered))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_every_separator() {
        let components =
            extract_active_ingredients("Lopinavir/Ritonavir + Abacavir, Lamivudine with Zinc");
        assert_eq!(
            components.as_slice(),
            ["lopinavir", "ritonavir", "abacavir", "lamivudine", "zinc"]
        );
    }

    #[test]
    fn strips_doses_and_forms_from_combination_components() {
        let components = extract_active_ingredients(
            "Amlodipine Besylate 5 mg & Atorvastatin Calcium 10mg Tablets",
        );
        assert_eq!(components.as_slice(), ["amlodipine", "atorvastatin"]);
    }

    #[test]
    fn single_names_are_not_component_stripped() {
        let components = extract_active_ingredients("Paracetamol 500 mg tablets");
        assert!(!components.is_combination());
        assert_eq!(components.first(), "paracetamol 500 mg tablets");
    }

    #[test]
    fn dose_only_fragments_fall_back_to_whole_name() {
        let components = extract_active_ingredients("10 mg / 20 mg");
        assert_eq!(components.len(), 1);
        assert_eq!(components.first(), "10 mg / 20 mg");
    }

    #[test]
    fn empty_name_yields_one_empty_component() {
        let components = extract_active_ingredients("");
        assert_eq!(components.len(), 1);
        assert_eq!(components.first(), "");
    }
}
