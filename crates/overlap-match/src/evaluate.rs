//! Precision and recall of a run against a gold set of known pairs.

use std::collections::BTreeSet;

use overlap_model::{MatchRecord, SourceDrug, TargetDrug};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::matcher::{MatchOptions, OverlapMatcher};

/// A known true source-to-target pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldPair {
    pub source_name: String,
    pub target_generic: String,
}

impl GoldPair {
    pub fn new(source_name: impl Into<String>, target_generic: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            target_generic: target_generic.into(),
        }
    }

    fn key(&self) -> (String, String) {
        pair_key(&self.source_name, &self.target_generic)
    }
}

fn pair_key(source: &str, target: &str) -> (String, String) {
    (source.trim().to_lowercase(), target.trim().to_lowercase())
}

/// Confusion counts and derived rates at one base threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub threshold: u8,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    /// Share of emitted matches that are gold pairs; 0 when nothing matched.
    pub precision: f64,
    /// Share of gold pairs that were emitted; 0 for an empty gold set.
    pub recall: f64,
    pub f1: f64,
}

/// Compare emitted `matches` with `gold`. Names compare case-insensitively.
pub fn evaluate(threshold: u8, matches: &[MatchRecord], gold: &[GoldPair]) -> Evaluation {
    let predicted: BTreeSet<_> = matches
        .iter()
        .map(|m| pair_key(&m.source_name, &m.target_generic))
        .collect();
    let expected: BTreeSet<_> = gold.iter().map(GoldPair::key).collect();

    let true_positives = predicted.intersection(&expected).count();
    let false_positives = predicted.len() - true_positives;
    let false_negatives = expected.len() - true_positives;

    let precision = rate(true_positives, predicted.len());
    let recall = rate(true_positives, expected.len());
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Evaluation {
        threshold,
        true_positives,
        false_positives,
        false_negatives,
        precision,
        recall,
        f1,
    }
}

fn rate(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

/// Run the matcher at each threshold and evaluate against `gold`.
///
/// Every run gets a fresh matcher so no memo state leaks between thresholds.
///
/// # Errors
///
/// Propagates input validation failures from the first run.
pub fn sweep(
    sources: &[SourceDrug],
    targets: &[TargetDrug],
    gold: &[GoldPair],
    thresholds: &[u8],
    options: &MatchOptions,
) -> Result<Vec<Evaluation>> {
    thresholds
        .iter()
        .map(|&threshold| {
            let matcher = OverlapMatcher::with_options(&MatchOptions {
                base_threshold: threshold,
                ..*options
            });
            let matches = matcher.find_overlaps(sources, targets)?;
            let evaluation = evaluate(threshold, &matches, gold);
            info!(
                threshold,
                precision = evaluation.precision,
                recall = evaluation.recall,
                "Threshold evaluated"
            );
            Ok(evaluation)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlap_model::MatchType;

    fn record(source: &str, generic: &str) -> MatchRecord {
        let source = SourceDrug {
            name: source.to_string(),
            ..SourceDrug::default()
        };
        let target = TargetDrug {
            generic_name: generic.to_string(),
            ..TargetDrug::default()
        };
        MatchRecord::new(0, &source, &target, 90.0, MatchType::Generic, String::new())
            .expect("valid score")
    }

    #[test]
    fn counts_hits_misses_and_extras() {
        let gold = [
            GoldPair::new("Zidovudine", "zidovudine"),
            GoldPair::new("Lamivudin", "lamivudine"),
        ];
        let matches = [record("zidovudine", "Zidovudine"), record("placebo", "aspirin")];
        let evaluation = evaluate(85, &matches, &gold);
        assert_eq!(evaluation.true_positives, 1);
        assert_eq!(evaluation.false_positives, 1);
        assert_eq!(evaluation.false_negatives, 1);
        assert_eq!(evaluation.precision, 0.5);
        assert_eq!(evaluation.recall, 0.5);
        assert_eq!(evaluation.f1, 0.5);
    }

    #[test]
    fn empty_runs_do_not_divide_by_zero() {
        let evaluation = evaluate(95, &[], &[]);
        assert_eq!(evaluation.precision, 0.0);
        assert_eq!(evaluation.recall, 0.0);
        assert_eq!(evaluation.f1, 0.0);
    }
}
