//! Per-record overlap matching between a source and a target registry.
//!
//! Each source record goes through three attempts in order: a direct
//! whole-name match, a single-ingredient versus combination-component match,
//! and a partial combination match. The best surviving candidate must clear
//! the base threshold and the indication gate before it becomes a proposal.
//! Proposals are finally resolved by a [`TargetAssignment`] so that each
//! target is claimed at most once.

use overlap_model::{MatchRecord, MatchType, Registry, SourceDrug, TargetDrug};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::assign::{AssignmentPolicy, TargetAssignment};
use crate::components::{ComponentSet, extract_active_ingredients};
use crate::error::{MatchError, Result};
use crate::indication::IndicationGate;
use crate::normalize::normalize_drug_name;
use crate::progress::ProgressObserver;
use crate::score::SimilarityScorer;
use crate::thresholds::{
    DEFAULT_BASE_THRESHOLD, PARTIAL_COMBINATION_CAP, PARTIAL_COMBINATION_FLOOR,
    PARTIAL_COMBINATION_SPAN, ThresholdProfile, build_thresholds,
};

/// Names shorter than this (in characters) are skipped.
const MIN_NAME_CHARS: usize = 3;

/// Run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Base threshold percentage all gates derive from.
    pub base_threshold: u8,
    pub assignment: AssignmentPolicy,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            base_threshold: DEFAULT_BASE_THRESHOLD,
            assignment: AssignmentPolicy::default(),
        }
    }
}

/// A scored target before thresholding and the indication gate.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate<'a> {
    pub target: &'a TargetDrug,
    pub score: f64,
    pub match_type: MatchType,
    pub matched_components: Option<Vec<String>>,
    pub coverage: Option<f64>,
    pub rationale: String,
}

impl<'a> MatchCandidate<'a> {
    fn plain(target: &'a TargetDrug, score: f64, match_type: MatchType, rationale: String) -> Self {
        Self {
            target,
            score,
            match_type,
            matched_components: None,
            coverage: None,
            rationale,
        }
    }

    fn into_record(self, source_index: usize, source: &SourceDrug) -> Result<MatchRecord> {
        let record = MatchRecord::new(
            source_index,
            source,
            self.target,
            self.score,
            self.match_type,
            self.rationale,
        )?;
        Ok(match (self.matched_components, self.coverage) {
            (Some(components), Some(coverage)) => record.with_components(components, coverage)?,
            _ => record,
        })
    }
}

/// Which pair of fields a whole-name comparison used.
#[derive(Debug, Clone, Copy)]
enum NameField {
    Generic,
    Trade,
    SaltGeneric,
    SaltTrade,
}

impl NameField {
    fn label(self) -> &'static str {
        match self {
            Self::Generic => "generic name",
            Self::Trade => "trade name",
            Self::SaltGeneric => "salt-normalized generic name",
            Self::SaltTrade => "salt-normalized trade name",
        }
    }
}

/// Finds overlapping drugs between two registries.
///
/// One matcher corresponds to one run: it owns the normalization memo, so it
/// is neither `Sync` nor meant to outlive the inputs it was used on.
#[derive(Debug)]
pub struct OverlapMatcher {
    profile: ThresholdProfile,
    scorer: SimilarityScorer,
    gate: IndicationGate,
    assignment: Box<dyn TargetAssignment>,
}

impl OverlapMatcher {
    /// Matcher with first-claim-wins assignment.
    pub fn new(base_threshold: i32) -> Self {
        let profile = build_thresholds(base_threshold);
        Self {
            profile,
            scorer: SimilarityScorer::new(profile),
            gate: IndicationGate::new(profile),
            assignment: AssignmentPolicy::FirstClaim.strategy(),
        }
    }

    pub fn with_options(options: &MatchOptions) -> Self {
        Self::new(i32::from(options.base_threshold)).with_assignment(options.assignment.strategy())
    }

    #[must_use]
    pub fn with_assignment(mut self, assignment: Box<dyn TargetAssignment>) -> Self {
        self.assignment = assignment;
        self
    }

    pub fn profile(&self) -> &ThresholdProfile {
        &self.profile
    }

    pub fn scorer(&self) -> &SimilarityScorer {
        &self.scorer
    }

    /// Match every source record against the full target collection.
    ///
    /// # Errors
    ///
    /// Fails before any matching if a record is missing its precomputed
    /// normalized name.
    pub fn find_overlaps(
        &self,
        sources: &[SourceDrug],
        targets: &[TargetDrug],
    ) -> Result<Vec<MatchRecord>> {
        self.find_overlaps_with_progress(sources, targets, &())
    }

    /// [`find_overlaps`](Self::find_overlaps) reporting to `observer`.
    ///
    /// # Errors
    ///
    /// See [`find_overlaps`](Self::find_overlaps).
    pub fn find_overlaps_with_progress(
        &self,
        sources: &[SourceDrug],
        targets: &[TargetDrug],
        observer: &dyn ProgressObserver,
    ) -> Result<Vec<MatchRecord>> {
        let span = info_span!(
            "find_overlaps",
            sources = sources.len(),
            targets = targets.len(),
            base = self.profile.base,
            assignment = self.assignment.name(),
        );
        let _guard = span.enter();

        validate_inputs(sources, targets)?;

        let target_components: Vec<ComponentSet> = targets
            .iter()
            .map(|target| extract_active_ingredients(&target.generic_name))
            .collect();

        observer.start(sources.len());
        let mut proposals = Vec::new();
        for (index, source) in sources.iter().enumerate() {
            if let Some(record) = self.match_source(index, source, targets, &target_components)? {
                proposals.push(record);
            }
            observer.advance(index + 1);
        }
        observer.finish();

        let proposed = proposals.len();
        let matches = self.assignment.assign(proposals);
        info!(
            proposed,
            matched = matches.len(),
            dropped_claims = proposed - matches.len(),
            "Overlap matching complete"
        );
        Ok(matches)
    }

    fn match_source(
        &self,
        index: usize,
        source: &SourceDrug,
        targets: &[TargetDrug],
        target_components: &[ComponentSet],
    ) -> Result<Option<MatchRecord>> {
        if source.name.trim().chars().count() < MIN_NAME_CHARS {
            debug!(row = index, name = %source.name, "Skipping name shorter than 3 characters");
            return Ok(None);
        }

        let Some(candidate) = self.best_candidate(source, targets, target_components) else {
            return Ok(None);
        };
        if candidate.score < self.profile.base_score() {
            return Ok(None);
        }

        let outcome = self.gate.assess(
            &self.scorer,
            &source.indication,
            &candidate.target.indication,
            candidate.score,
        );
        if !outcome.accepted {
            debug!(
                row = index,
                name = %source.name,
                target = %candidate.target.generic_name,
                score = candidate.score,
                indication_similarity = outcome.similarity,
                required = ?outcome.required,
                "Indication gate rejected match"
            );
            return Ok(None);
        }

        debug!(
            row = index,
            name = %source.name,
            target = %candidate.target.generic_name,
            score = candidate.score,
            match_type = %candidate.match_type,
            "Match accepted"
        );
        candidate.into_record(index, source).map(Some)
    }

    /// Best candidate for `source`, before thresholding.
    pub fn best_candidate<'t>(
        &self,
        source: &SourceDrug,
        targets: &'t [TargetDrug],
        target_components: &[ComponentSet],
    ) -> Option<MatchCandidate<'t>> {
        let direct = self.direct_match(source, targets);
        if let Some(candidate) = &direct
            && candidate.score >= f64::from(self.profile.component_accept)
        {
            return direct;
        }

        let components = extract_active_ingredients(&source.name);
        let combination = if components.is_combination() {
            self.partial_combination_match(&components, targets)
        } else {
            self.component_match(source, targets, target_components)
        };
        combination.or(direct)
    }

    /// Best whole-name comparison across every target and name field.
    ///
    /// A later comparison replaces the current best only when it scores
    /// strictly higher.
    pub fn direct_match<'t>(
        &self,
        source: &SourceDrug,
        targets: &'t [TargetDrug],
    ) -> Option<MatchCandidate<'t>> {
        let normalizer = self.scorer.normalizer();
        let source_salt = normalizer.normalize_for_salt_comparison(&source.name);

        let mut best: Option<(f64, NameField, &TargetDrug)> = None;
        for target in targets {
            let comparisons = [
                (NameField::Generic, &source.normalized_name, target.generic_normalized.clone()),
                (NameField::Trade, &source.normalized_name, target.trade_normalized.clone()),
                (
                    NameField::SaltGeneric,
                    &source_salt,
                    normalizer.normalize_for_salt_comparison(&target.generic_name),
                ),
                (
                    NameField::SaltTrade,
                    &source_salt,
                    normalizer.normalize_for_salt_comparison(&target.trade_name),
                ),
            ];
            for (field, left, right) in comparisons {
                let score = self.scorer.calculate_similarity(left, &right);
                if score > best.map_or(0.0, |(current, _, _)| current) {
                    best = Some((score, field, target));
                }
            }
        }

        best.map(|(score, field, target)| {
            let match_type = match field {
                NameField::SaltGeneric | NameField::SaltTrade
                    if score > self.profile.salt_variant_marker() =>
                {
                    MatchType::SaltVariant
                }
                NameField::Generic | NameField::SaltGeneric => MatchType::Generic,
                NameField::Trade | NameField::SaltTrade => MatchType::Trade,
            };
            let rationale = format!("{} similarity {score:.1}", field.label());
            MatchCandidate::plain(target, score, match_type, rationale)
        })
    }

    /// Single-ingredient source against the components of combination targets.
    ///
    /// The first target with a qualifying component wins.
    pub fn component_match<'t>(
        &self,
        source: &SourceDrug,
        targets: &'t [TargetDrug],
        target_components: &[ComponentSet],
    ) -> Option<MatchCandidate<'t>> {
        let normalizer = self.scorer.normalizer();
        let base_name = normalizer.extract_base_drug_name(&source.name);
        let required = f64::from(self.profile.component_match);

        targets
            .iter()
            .zip(target_components)
            .filter(|(_, components)| components.is_combination())
            .find_map(|(target, components)| {
                let hit = components.iter().find(|component| {
                    let component = normalizer.normalize_for_salt_comparison(component);
                    self.scorer.calculate_similarity(&base_name, &component) >= required
                })?;
                let coverage = 1.0 / components.len() as f64;
                Some(MatchCandidate {
                    target,
                    score: self.profile.combination_component_score(),
                    match_type: MatchType::CombinationComponent,
                    matched_components: Some(vec![source.name.clone()]),
                    coverage: Some(coverage),
                    rationale: format!(
                        "'{}' matches component '{hit}' of {} components",
                        source.name,
                        components.len()
                    ),
                })
            })
    }

    /// Combination source matched component by component.
    ///
    /// Keeps the target with the highest coverage at or above the minimum;
    /// the earliest target wins ties.
    pub fn partial_combination_match<'t>(
        &self,
        components: &ComponentSet,
        targets: &'t [TargetDrug],
    ) -> Option<MatchCandidate<'t>> {
        let accept = f64::from(self.profile.component_accept);
        let mut best: Option<(f64, Vec<String>, &TargetDrug)> = None;

        for target in targets {
            let matched: Vec<String> = components
                .iter()
                .filter(|component| {
                    let generic = self
                        .scorer
                        .calculate_similarity(component, &target.generic_normalized);
                    let trade = self
                        .scorer
                        .calculate_similarity(component, &target.trade_normalized);
                    generic.max(trade) >= accept
                })
                .cloned()
                .collect();
            let coverage = matched.len() as f64 / components.len() as f64;
            if coverage >= self.profile.combination_min_coverage
                && best.as_ref().is_none_or(|(current, _, _)| coverage > *current)
            {
                best = Some((coverage, matched, target));
            }
        }

        best.map(|(coverage, matched, target)| {
            let score = (PARTIAL_COMBINATION_FLOOR + coverage * PARTIAL_COMBINATION_SPAN)
                .min(PARTIAL_COMBINATION_CAP);
            MatchCandidate {
                target,
                score,
                match_type: MatchType::PartialCombination,
                rationale: format!(
                    "{} of {} components matched",
                    matched.len(),
                    components.len()
                ),
                matched_components: Some(matched),
                coverage: Some(coverage),
            }
        })
    }
}

impl Default for OverlapMatcher {
    fn default() -> Self {
        Self::with_options(&MatchOptions::default())
    }
}

/// Reject collections that were not prepared for matching.
///
/// # Errors
///
/// Returns [`MatchError::NotNormalized`] for a record whose normalized names
/// were never attached. Blank names are not an error: such a record simply
/// never scores above zero.
pub fn validate_inputs(sources: &[SourceDrug], targets: &[TargetDrug]) -> Result<()> {
    for (row, source) in sources.iter().enumerate() {
        check_normalized(
            Registry::Source,
            row,
            "normalized_name",
            &source.name,
            &source.normalized_name,
        )?;
    }
    for (row, target) in targets.iter().enumerate() {
        if target.generic_name.trim().is_empty() && target.trade_name.trim().is_empty() {
            debug!(row, "Target has no generic or trade name and cannot match");
        }
        check_normalized(
            Registry::Target,
            row,
            "generic_normalized",
            &target.generic_name,
            &target.generic_normalized,
        )?;
        check_normalized(
            Registry::Target,
            row,
            "trade_normalized",
            &target.trade_name,
            &target.trade_normalized,
        )?;
    }
    Ok(())
}

fn check_normalized(
    registry: Registry,
    row: usize,
    field: &'static str,
    raw: &str,
    normalized: &str,
) -> Result<()> {
    if normalized.is_empty() && !normalize_drug_name(raw).is_empty() {
        return Err(MatchError::NotNormalized {
            registry,
            row,
            field,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str) -> SourceDrug {
        SourceDrug {
            name: name.to_string(),
            normalized_name: normalize_drug_name(name),
            indication: "HIV infection".to_string(),
            approval_date: String::new(),
        }
    }

    fn target(generic: &str, trade: &str) -> TargetDrug {
        TargetDrug {
            generic_name: generic.to_string(),
            trade_name: trade.to_string(),
            generic_normalized: normalize_drug_name(generic),
            trade_normalized: normalize_drug_name(trade),
            indication: "HIV infection".to_string(),
            ..TargetDrug::default()
        }
    }

    #[test]
    fn trade_name_matches_surface_trade_name() {
        let matcher = OverlapMatcher::new(85);
        let matches = matcher
            .find_overlaps(&[source("Retrovir")], &[target("zidovudine", "Retrovir")])
            .expect("valid inputs");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_type, MatchType::Trade);
        assert_eq!(matches[0].matched_name, "Retrovir");
    }

    #[test]
    fn single_ingredient_matches_combination_component() {
        let matcher = OverlapMatcher::new(85);
        let targets = [target("emtricitabine/tenofovir", "Truvada")];
        let components = [extract_active_ingredients("emtricitabine/tenofovir")];
        let candidate = matcher
            .best_candidate(&source("tenofovir"), &targets, &components)
            .expect("component candidate");
        assert_eq!(candidate.match_type, MatchType::CombinationComponent);
        assert_eq!(candidate.score, matcher.profile().combination_component_score());
        assert_eq!(candidate.coverage, Some(0.5));
        assert_eq!(candidate.matched_components, Some(vec!["tenofovir".to_string()]));
    }

    #[test]
    fn combination_source_scores_by_coverage() {
        let matcher = OverlapMatcher::new(85);
        let targets = [
            target("zidovudine", "Retrovir"),
            target("lopinavir", "Aluviran"),
            target("ritonavir", "Norvir"),
        ];
        let components = extract_active_ingredients("lopinavir + ritonavir");
        let candidate = matcher
            .partial_combination_match(&components, &targets)
            .expect("partial candidate");
        assert_eq!(candidate.target.generic_name, "lopinavir");
        assert_eq!(candidate.match_type, MatchType::PartialCombination);
        assert_eq!(candidate.coverage, Some(0.5));
        assert_eq!(candidate.score, 87.5);
        assert_eq!(candidate.matched_components, Some(vec!["lopinavir".to_string()]));

        let sparse = extract_active_ingredients("lopinavir + abacavir + lamivudine");
        assert!(matcher.partial_combination_match(&sparse, &targets).is_none());
    }

    #[test]
    fn short_names_are_skipped() {
        let matcher = OverlapMatcher::new(85);
        let matches = matcher
            .find_overlaps(&[source("ab")], &[target("ab", "")])
            .expect("valid inputs");
        assert!(matches.is_empty());
    }

    #[test]
    fn nameless_targets_are_left_unmatched() {
        let mut nameless = target("", "");
        nameless.indication = "Orphan indication pending".to_string();
        let matches = OverlapMatcher::new(85)
            .find_overlaps(
                &[source("Retrovir"), source("Orphan indication pending")],
                &[target("zidovudine", "Retrovir"), nameless],
            )
            .expect("blank names are absence of evidence");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].target_generic, "zidovudine");
    }

    #[test]
    fn missing_normalized_names_fail_before_matching() {
        let mut unprepared = source("zidovudine");
        unprepared.normalized_name.clear();
        let err = OverlapMatcher::new(85)
            .find_overlaps(&[source("Retrovir"), unprepared], &[])
            .expect_err("unnormalized source");
        assert_eq!(
            err,
            MatchError::NotNormalized {
                registry: Registry::Source,
                row: 1,
                field: "normalized_name",
            }
        );
    }
}
