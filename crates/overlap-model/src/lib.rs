pub mod error;
pub mod matching;
pub mod record;

pub use error::{ModelError, Result};
pub use matching::{MatchRecord, MatchType};
pub use record::{Registry, SourceDrug, Sponsor, TargetDrug, TargetKey, target_key};
