//! Registry ingestion: CSV files in, prepared records out.

#![deny(unsafe_code)]

pub mod error;
pub mod loader;

pub use error::{IngestError, Result};
pub use loader::{load_gold_pairs, load_source_registry, load_target_registry};
