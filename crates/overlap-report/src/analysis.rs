//! Post-run summary of an overlap report.

use overlap_match::{ConfidenceBand, ThresholdProfile};
use serde::Serialize;

use crate::row::OverlapRow;

/// Number of pairs listed in [`OverlapAnalysis::top_matches`].
pub const TOP_MATCH_COUNT: usize = 10;

/// Indication lengths differing by more than this many characters are flagged.
pub const INDICATION_LENGTH_GAP: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMatch {
    pub source_name: String,
    pub matched_name: String,
    #[serde(serialize_with = "crate::row::serialize_score")]
    pub score: f64,
}

/// Volumes, confidence bands and review hints for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapAnalysis {
    pub total: usize,
    pub high_floor: u8,
    pub medium_floor: u8,
    pub high_confidence: usize,
    pub medium_confidence: usize,
    pub top_matches: Vec<TopMatch>,
    /// Rows whose two indications differ in length by more than 200 characters.
    pub indication_length_gaps: usize,
    pub missing_source_dates: usize,
    pub missing_target_dates: usize,
}

impl OverlapAnalysis {
    /// Summarize `rows`, which are expected in report (score) order.
    pub fn from_rows(rows: &[OverlapRow], profile: &ThresholdProfile) -> Self {
        let band_count = |band: ConfidenceBand| {
            rows.iter()
                .filter(|row| profile.confidence_band(row.score) == Some(band))
                .count()
        };
        Self {
            total: rows.len(),
            high_floor: profile.high_gate,
            medium_floor: profile.base,
            high_confidence: band_count(ConfidenceBand::High),
            medium_confidence: band_count(ConfidenceBand::Medium),
            top_matches: rows
                .iter()
                .take(TOP_MATCH_COUNT)
                .map(|row| TopMatch {
                    source_name: row.source_name.clone(),
                    matched_name: row.matched_name.clone(),
                    score: row.score,
                })
                .collect(),
            indication_length_gaps: rows
                .iter()
                .filter(|row| {
                    row.source_indication
                        .chars()
                        .count()
                        .abs_diff(row.target_indication.chars().count())
                        > INDICATION_LENGTH_GAP
                })
                .count(),
            missing_source_dates: rows
                .iter()
                .filter(|row| row.source_approval_date.is_empty())
                .count(),
            missing_target_dates: rows
                .iter()
                .filter(|row| row.target_approval_date.is_empty())
                .count(),
        }
    }
}
