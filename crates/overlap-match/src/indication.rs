//! Secondary verification of a name match against therapeutic-use text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::score::SimilarityScorer;
use crate::thresholds::ThresholdProfile;

static CAPITALIZED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("Invalid capitalized word regex"));

static MEDICAL_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:cancer|carcinoma|tumou?r|lymphoma|leukemia|syndrome|disease|disorder|deficiency|infection)\b",
    )
    .expect("Invalid medical keyword regex")
});

/// Overlap ratio above which shared terms boost the text similarity.
const TERM_OVERLAP_MIN: f64 = 0.3;
const TERM_OVERLAP_BOOST: f64 = 10.0;

/// Result of checking one pair of indications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateOutcome {
    /// Indication similarity the name score demands; `None` when a text was missing.
    pub required: Option<f64>,
    /// Similarity after any term-overlap boost.
    pub similarity: f64,
    pub accepted: bool,
}

/// Indication check whose bar drops as name confidence rises.
#[derive(Debug, Clone, Copy)]
pub struct IndicationGate {
    profile: ThresholdProfile,
}

impl IndicationGate {
    pub fn new(profile: ThresholdProfile) -> Self {
        Self { profile }
    }

    /// Name-score tiers, strongest first, paired with the indication
    /// similarity each one requires.
    pub fn tiers(&self) -> [(u8, u8); 3] {
        let p = &self.profile;
        [
            (p.salt_gate, p.indication_loose),
            (p.high_gate, p.indication_medium),
            (p.medium_gate, p.indication_strict),
        ]
    }

    /// Indication similarity required for a given name score.
    pub fn required_similarity(&self, name_score: f64) -> f64 {
        self.tiers()
            .into_iter()
            .find(|&(gate, _)| name_score >= f64::from(gate))
            .map_or(self.profile.indication_base, |(_, required)| required)
            .into()
    }

    /// Whether the indications corroborate a name match scoring `name_score`.
    pub fn verify(
        &self,
        scorer: &SimilarityScorer,
        source_indication: &str,
        target_indication: &str,
        name_score: f64,
    ) -> bool {
        self.assess(scorer, source_indication, target_indication, name_score)
            .accepted
    }

    /// Like [`verify`](Self::verify), keeping the numbers for rationale text.
    pub fn assess(
        &self,
        scorer: &SimilarityScorer,
        source_indication: &str,
        target_indication: &str,
        name_score: f64,
    ) -> GateOutcome {
        if source_indication.trim().is_empty() || target_indication.trim().is_empty() {
            return GateOutcome {
                required: None,
                similarity: 0.0,
                accepted: name_score >= f64::from(self.profile.missing_indication_floor),
            };
        }

        let required = self.required_similarity(name_score);
        let mut similarity = scorer.calculate_similarity(source_indication, target_indication);

        let source_terms = indication_terms(source_indication);
        let target_terms = indication_terms(target_indication);
        if !source_terms.is_empty() && !target_terms.is_empty() {
            let shared = source_terms.intersection(&target_terms).count();
            let smaller = source_terms.len().min(target_terms.len());
            if shared as f64 / smaller as f64 > TERM_OVERLAP_MIN {
                similarity = (similarity + TERM_OVERLAP_BOOST).min(100.0);
            }
        }

        GateOutcome {
            required: Some(required),
            similarity,
            accepted: similarity >= required,
        }
    }
}

/// Capitalized words and medical keywords of `text`, lowercased.
pub fn indication_terms(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    CAPITALIZED_WORD
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .chain(
            MEDICAL_KEYWORD
                .find_iter(&lowered)
                .map(|m| m.as_str().to_string()),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::build_thresholds;

    fn fixtures() -> (IndicationGate, SimilarityScorer) {
        let profile = build_thresholds(85);
        (IndicationGate::new(profile), SimilarityScorer::new(profile))
    }

    #[test]
    fn tier_lookup_relaxes_with_name_confidence() {
        let (gate, _) = fixtures();
        assert_eq!(gate.required_similarity(100.0), 40.0);
        assert_eq!(gate.required_similarity(98.0), 40.0);
        assert_eq!(gate.required_similarity(96.0), 50.0);
        assert_eq!(gate.required_similarity(92.0), 65.0);
        assert_eq!(gate.required_similarity(86.0), 70.0);
    }

    #[test]
    fn missing_indication_demands_near_certain_name() {
        let (gate, scorer) = fixtures();
        assert!(gate.verify(&scorer, "", "HIV infection", 95.0));
        assert!(!gate.verify(&scorer, "   ", "HIV infection", 94.9));
        let outcome = gate.assess(&scorer, "HIV infection", "", 100.0);
        assert_eq!(outcome.required, None);
        assert!(outcome.accepted);
    }

    #[test]
    fn terms_collect_capitalized_words_and_keywords() {
        let terms = indication_terms("Treatment of Hodgkin lymphoma and solid tumour");
        let expected: BTreeSet<String> = ["treatment", "hodgkin", "lymphoma", "tumour"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(terms, expected);
    }

    #[test]
    fn unrelated_indications_are_rejected_for_typo_names() {
        let (gate, scorer) = fixtures();
        let outcome = gate.assess(
            &scorer,
            "seasonal allergic rhinitis",
            "metastatic melanoma",
            92.3,
        );
        assert_eq!(outcome.required, Some(65.0));
        assert!(!outcome.accepted);
    }

    #[test]
    fn shared_terms_boost_similarity() {
        let (gate, scorer) = fixtures();
        let plain = scorer.calculate_similarity("Fabry disease", "Gaucher disease");
        let outcome = gate.assess(&scorer, "Fabry disease", "Gaucher disease", 86.0);
        assert!(plain < 90.0);
        assert_eq!(outcome.similarity, plain + 10.0);
    }
}
