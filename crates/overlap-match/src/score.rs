//! Salt-aware similarity scoring between two names or free-text fields.

use crate::metrics::{ratio, token_set_ratio, token_sort_ratio};
use crate::normalize::NameNormalizer;
use crate::thresholds::ThresholdProfile;

/// Scores string pairs on a `0..=100` scale using a [`ThresholdProfile`].
///
/// Owns the [`NameNormalizer`] whose salt memo is shared by every comparison
/// in a run.
#[derive(Debug)]
pub struct SimilarityScorer {
    profile: ThresholdProfile,
    normalizer: NameNormalizer,
}

impl SimilarityScorer {
    pub fn new(profile: ThresholdProfile) -> Self {
        Self {
            profile,
            normalizer: NameNormalizer::new(),
        }
    }

    pub fn profile(&self) -> &ThresholdProfile {
        &self.profile
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    /// Similarity of `a` and `b`.
    ///
    /// Exact matches (ignoring case and surrounding whitespace) score 100.
    /// Pairs whose character ratio falls below the quick-compare floor return
    /// that ratio unchanged. Pairs that become identical after salt
    /// normalization score
    /// [`ThresholdProfile::salt_variant_score`]. Everything else takes the
    /// best of the character, token-sort and token-set ratios.
    #[must_use]
    pub fn calculate_similarity(&self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let left = a.trim().to_lowercase();
        let right = b.trim().to_lowercase();
        if left == right {
            return 100.0;
        }

        let quick = ratio(&left, &right);
        if quick < f64::from(self.profile.quick_compare_floor) {
            return quick;
        }

        if quick >= f64::from(self.profile.salt_check_floor) {
            let salt_left = self.normalizer.normalize_for_salt_comparison(a);
            let salt_right = self.normalizer.normalize_for_salt_comparison(b);
            if !salt_left.is_empty() && salt_left == salt_right {
                return self.profile.salt_variant_score();
            }
        }

        quick
            .max(token_sort_ratio(&left, &right))
            .max(token_set_ratio(&left, &right))
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(ThresholdProfile::default())
    }
}
