//! Drug name normalization, similarity scoring and registry overlap matching.

#![deny(unsafe_code)]

pub mod assign;
pub mod components;
pub mod error;
pub mod evaluate;
pub mod indication;
pub mod matcher;
pub mod metrics;
pub mod normalize;
pub mod progress;
pub mod score;
pub mod thresholds;

pub use assign::{AssignmentPolicy, FirstClaimWins, HighestScoreWins, TargetAssignment};
pub use components::{ComponentSet, extract_active_ingredients};
pub use error::{MatchError, Result};
pub use evaluate::{Evaluation, GoldPair, evaluate, sweep};
pub use indication::{GateOutcome, IndicationGate};
pub use matcher::{MatchCandidate, MatchOptions, OverlapMatcher, validate_inputs};
pub use normalize::{NameNormalizer, SaltCache, normalize_drug_name};
pub use progress::{ProgressCounter, ProgressObserver};
pub use score::SimilarityScorer;
pub use thresholds::{ConfidenceBand, ThresholdProfile, build_thresholds};
