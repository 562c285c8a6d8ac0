//! Errors that abort a matching run before any record is scored.

use overlap_model::{ModelError, Registry};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    /// A record has a raw name but its precomputed normalized field is blank.
    #[error("{registry} row {row}: `{field}` was not precomputed for a non-empty name")]
    NotNormalized {
        registry: Registry,
        row: usize,
        field: &'static str,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, MatchError>;
