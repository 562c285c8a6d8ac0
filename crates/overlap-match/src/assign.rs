//! Target assignment: each target may be claimed by at most one source.
//!
//! Scoring never looks at claims. The matcher hands every gate-accepted
//! proposal, in source order, to a [`TargetAssignment`] which decides who
//! keeps each target.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use overlap_model::{MatchRecord, TargetKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resolves competing claims on the same target.
pub trait TargetAssignment: std::fmt::Debug {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Keep at most one proposal per target key. `proposals` arrive in
    /// source iteration order and the result must stay in that order.
    fn assign(&self, proposals: Vec<MatchRecord>) -> Vec<MatchRecord>;
}

/// The earliest source to claim a target keeps it, whatever later claimants score.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstClaimWins;

impl TargetAssignment for FirstClaimWins {
    fn name(&self) -> &'static str {
        "first-claim"
    }

    fn assign(&self, proposals: Vec<MatchRecord>) -> Vec<MatchRecord> {
        let mut claimed: HashSet<TargetKey> = HashSet::new();
        proposals
            .into_iter()
            .filter(|record| {
                let fresh = claimed.insert(record.target_key());
                if !fresh {
                    debug!(
                        row = record.source_index,
                        target = %record.target_generic,
                        "Target already claimed; dropping match"
                    );
                }
                fresh
            })
            .collect()
    }
}

/// The highest-scoring claimant keeps a target; ties go to the earliest.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestScoreWins;

impl TargetAssignment for HighestScoreWins {
    fn name(&self) -> &'static str {
        "highest-score"
    }

    fn assign(&self, proposals: Vec<MatchRecord>) -> Vec<MatchRecord> {
        let mut winners: HashMap<TargetKey, usize> = HashMap::new();
        for (position, record) in proposals.iter().enumerate() {
            match winners.entry(record.target_key()) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(mut slot) => {
                    if record.score > proposals[*slot.get()].score {
                        slot.insert(position);
                    }
                }
            }
        }
        proposals
            .into_iter()
            .enumerate()
            .filter(|(position, record)| {
                let kept = winners.get(&record.target_key()) == Some(position);
                if !kept {
                    debug!(
                        row = record.source_index,
                        target = %record.target_generic,
                        "Higher-scoring claim holds target; dropping match"
                    );
                }
                kept
            })
            .map(|(_, record)| record)
            .collect()
    }
}

/// Serializable choice of [`TargetAssignment`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentPolicy {
    #[default]
    FirstClaim,
    HighestScore,
}

impl AssignmentPolicy {
    pub fn strategy(self) -> Box<dyn TargetAssignment> {
        match self {
            Self::FirstClaim => Box::new(FirstClaimWins),
            Self::HighestScore => Box::new(HighestScoreWins),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlap_model::{MatchType, SourceDrug, TargetDrug};

    fn proposal(index: usize, generic: &str, score: f64) -> MatchRecord {
        let source = SourceDrug {
            name: format!("source {index}"),
            ..SourceDrug::default()
        };
        let target = TargetDrug {
            generic_name: generic.to_string(),
            trade_name: format!("{generic} brand"),
            ..TargetDrug::default()
        };
        MatchRecord::new(index, &source, &target, score, MatchType::Generic, String::new())
            .expect("valid score")
    }

    fn indices(records: &[MatchRecord]) -> Vec<usize> {
        records.iter().map(|r| r.source_index).collect()
    }

    #[test]
    fn first_claim_keeps_earliest_source() {
        let kept = FirstClaimWins.assign(vec![
            proposal(0, "alpha", 86.0),
            proposal(1, "beta", 90.0),
            proposal(2, "alpha", 100.0),
        ]);
        assert_eq!(indices(&kept), vec![0, 1]);
    }

    #[test]
    fn highest_score_keeps_best_claimant_in_source_order() {
        let kept = HighestScoreWins.assign(vec![
            proposal(0, "alpha", 86.0),
            proposal(1, "beta", 90.0),
            proposal(2, "alpha", 100.0),
            proposal(3, "beta", 90.0),
        ]);
        assert_eq!(indices(&kept), vec![1, 2]);
    }

    #[test]
    fn policy_round_trips_through_kebab_case() {
        let policy: AssignmentPolicy =
            serde_json::from_str("\"highest-score\"").expect("valid policy");
        assert_eq!(policy, AssignmentPolicy::HighestScore);
        assert_eq!(policy.strategy().name(), "highest-score");
        assert_eq!(AssignmentPolicy::default().strategy().name(), "first-claim");
    }
}
