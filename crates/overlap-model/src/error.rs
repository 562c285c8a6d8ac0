use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("component coverage {0} is outside 0..=1")]
    CoverageOutOfRange(f64),
    #[error("match score {0} is outside 0..=100")]
    ScoreOutOfRange(f64),
}

pub type Result<T> = std::result::Result<T, ModelError>;
