//! Decision thresholds derived from a single base percentage.
//!
//! Operators tune one knob; every dependent gate moves with it so the
//! calibrated gaps between gates stay fixed. The historical values in the
//! comments are what each field evaluates to at the default base of 85.

use serde::{Deserialize, Serialize};

/// Base threshold used when none is configured.
pub const DEFAULT_BASE_THRESHOLD: u8 = 85;

/// Score returned for names that are identical after salt normalization.
pub const SALT_VARIANT_SCORE: f64 = 98.0;

/// Score assigned when a single-ingredient name matches a combination component.
pub const COMBINATION_COMPONENT_SCORE: f64 = 95.0;

/// Floor and span of partial-combination scores: `floor + coverage * span`.
pub const PARTIAL_COMBINATION_FLOOR: f64 = 80.0;
pub const PARTIAL_COMBINATION_SPAN: f64 = 15.0;
pub const PARTIAL_COMBINATION_CAP: f64 = 95.0;

fn clamp_percentage(value: i32) -> u8 {
    // Clamped to 0..=100 so the narrowing cast is lossless.
    value.clamp(0, 100) as u8
}

/// Immutable set of percentages derived from `base`.
///
/// Rebuild with [`build_thresholds`] when the base changes; never mutate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProfile {
    pub base: u8,
    /// Below this cheap ratio, similarity short-circuits (70).
    pub quick_compare_floor: u8,
    /// At or above this cheap ratio, salt normalization is tried (80).
    pub salt_check_floor: u8,
    /// Single name vs combination component acceptance (90).
    pub component_match: u8,
    /// Direct and per-component acceptance (85).
    pub component_accept: u8,
    pub partial_combo_floor: u8,
    /// Name score tier for the loosest indication check (98).
    pub salt_gate: u8,
    /// (95)
    pub high_gate: u8,
    /// (90)
    pub medium_gate: u8,
    /// (40)
    pub indication_loose: u8,
    /// (50)
    pub indication_medium: u8,
    /// (65)
    pub indication_strict: u8,
    /// (70)
    pub indication_base: u8,
    /// Name score required when an indication is missing (95).
    pub missing_indication_floor: u8,
    pub combination_min_coverage: f64,
}

/// Derive every threshold from `base_percent`, clamping each to `0..=100`.
pub fn build_thresholds(base_percent: i32) -> ThresholdProfile {
    let base = i32::from(clamp_percentage(base_percent));
    ThresholdProfile {
        base: clamp_percentage(base),
        quick_compare_floor: clamp_percentage(base - 15),
        salt_check_floor: clamp_percentage(base - 5),
        component_match: clamp_percentage(base + 5),
        component_accept: clamp_percentage(base),
        partial_combo_floor: clamp_percentage(base - 5),
        salt_gate: clamp_percentage(base + 13),
        high_gate: clamp_percentage(base + 10),
        medium_gate: clamp_percentage(base + 5),
        indication_loose: clamp_percentage(base - 45),
        indication_medium: clamp_percentage(base - 35),
        indication_strict: clamp_percentage(base - 20),
        indication_base: clamp_percentage(base - 15),
        missing_indication_floor: clamp_percentage(base + 10),
        combination_min_coverage: 0.5,
    }
}

impl Default for ThresholdProfile {
    fn default() -> Self {
        build_thresholds(i32::from(DEFAULT_BASE_THRESHOLD))
    }
}

/// Confidence band of an accepted match score, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    /// At or above `base`, below `high_gate`.
    Medium,
    /// At or above `high_gate`.
    High,
}

impl ThresholdProfile {
    /// Base threshold as a score for comparisons.
    pub fn base_score(&self) -> f64 {
        f64::from(self.base)
    }

    /// Score for names identical after salt normalization.
    pub fn salt_variant_score(&self) -> f64 {
        SALT_VARIANT_SCORE
    }

    /// Score for a single ingredient found inside a combination target.
    pub fn combination_component_score(&self) -> f64 {
        COMBINATION_COMPONENT_SCORE
    }

    /// A winning salt-normalized comparison above this is labelled a salt variant.
    pub fn salt_variant_marker(&self) -> f64 {
        f64::from(self.medium_gate)
    }

    /// Band for a match score; `None` below the base threshold.
    pub fn confidence_band(&self, score: f64) -> Option<ConfidenceBand> {
        if score >= f64::from(self.high_gate) {
            Some(ConfidenceBand::High)
        } else if score >= self.base_score() {
            Some(ConfidenceBand::Medium)
        } else {
            None
        }
    }

    /// Every integer threshold in declaration order, for property checks.
    pub fn percentages(&self) -> [u8; 14] {
        [
            self.base,
            self.quick_compare_floor,
            self.salt_check_floor,
            self.component_match,
            self.component_accept,
            self.partial_combo_floor,
            self.salt_gate,
            self.high_gate,
            self.medium_gate,
            self.indication_loose,
            self.indication_medium,
            self.indication_strict,
            self.indication_base,
            self.missing_indication_floor,
        ]
    }
}
