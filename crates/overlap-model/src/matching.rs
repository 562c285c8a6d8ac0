//! Match results emitted by the overlap engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::record::{SourceDrug, Sponsor, TargetDrug, TargetKey, target_key};

/// How a source record was linked to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Source name matched the target generic name.
    Generic,
    /// Source name matched the target trade name.
    Trade,
    /// Names are the same once salt and formulation words are removed.
    SaltVariant,
    /// Single-ingredient source matched one component of a target combination.
    CombinationComponent,
    /// Combination source where enough components matched the target.
    PartialCombination,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Trade => "trade",
            Self::SaltVariant => "salt_variant",
            Self::CombinationComponent => "combination_component",
            Self::PartialCombination => "partial_combination",
        }
    }

    /// Whether the report should surface the target trade name.
    pub fn surfaces_trade_name(&self) -> bool {
        matches!(self, Self::Trade)
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finalized source-to-target link.
///
/// Owned by the caller once emitted; the engine keeps no reference to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Position of the source record in the scanned collection.
    pub source_index: usize,
    pub source_name: String,
    pub source_indication: String,
    pub source_approval_date: String,
    /// Generic name, or trade name when the match type is [`MatchType::Trade`].
    pub matched_name: String,
    pub target_generic: String,
    pub target_trade: String,
    pub target_indication: String,
    pub target_approval_date: String,
    pub target_sponsor: Option<Sponsor>,
    pub score: f64,
    pub match_type: MatchType,
    pub rationale: String,
    pub matched_components: Option<Vec<String>>,
    pub coverage: Option<f64>,
}

impl MatchRecord {
    /// Build a record from the source and the target it claimed.
    ///
    /// # Errors
    ///
    /// Returns an error if the score or coverage is out of range.
    pub fn new(
        source_index: usize,
        source: &SourceDrug,
        target: &TargetDrug,
        score: f64,
        match_type: MatchType,
        rationale: String,
    ) -> Result<Self> {
        if !(0.0..=100.0).contains(&score) {
            return Err(ModelError::ScoreOutOfRange(score));
        }
        let matched_name = if match_type.surfaces_trade_name() {
            target.trade_name.clone()
        } else {
            target.generic_name.clone()
        };
        Ok(Self {
            source_index,
            source_name: source.name.clone(),
            source_indication: source.indication.clone(),
            source_approval_date: source.approval_date.clone(),
            matched_name,
            target_generic: target.generic_name.clone(),
            target_trade: target.trade_name.clone(),
            target_indication: target.indication.clone(),
            target_approval_date: target.approval_date.clone(),
            target_sponsor: target.sponsor.clone(),
            score,
            match_type,
            rationale,
            matched_components: None,
            coverage: None,
        })
    }

    /// Attach combination metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if `coverage` is outside `0..=1`.
    pub fn with_components(mut self, components: Vec<String>, coverage: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&coverage) {
            return Err(ModelError::CoverageOutOfRange(coverage));
        }
        self.matched_components = Some(components);
        self.coverage = Some(coverage);
        Ok(self)
    }

    /// The claimed target's identity, the same key as [`TargetDrug::identity_key`].
    pub fn target_key(&self) -> TargetKey {
        target_key(&self.target_generic, &self.target_trade)
    }
}
