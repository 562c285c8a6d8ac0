//! Registry records as handed to the matching engine.
//!
//! Records are immutable once built. Normalized names are attached by the
//! loader so the engine never re-derives them from scratch.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which registry a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Registry {
    /// The domestic regulatory list being scanned.
    Source,
    /// The foreign orphan-drug list being matched against.
    Target,
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// A drug entry from the source registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDrug {
    pub name: String,
    pub normalized_name: String,
    pub indication: String,
    pub approval_date: String,
}

/// Sponsor details carried through to reports; never used for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    pub company: String,
    pub state: String,
    pub country: String,
}

/// A drug entry from the target registry, with generic and trade names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetDrug {
    pub generic_name: String,
    pub trade_name: String,
    pub generic_normalized: String,
    pub trade_normalized: String,
    pub indication: String,
    pub approval_date: String,
    pub sponsor: Option<Sponsor>,
}

/// Identity of a target record for claim tracking: (generic, trade).
pub type TargetKey = (String, String);

/// Build the [`TargetKey`] for a generic and trade name pair.
pub fn target_key(generic_name: &str, trade_name: &str) -> TargetKey {
    (generic_name.to_string(), trade_name.to_string())
}

impl TargetDrug {
    /// The (generic, trade) pair that identifies this target within a run.
    pub fn identity_key(&self) -> TargetKey {
        target_key(&self.generic_name, &self.trade_name)
    }
}
