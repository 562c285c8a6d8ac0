//! Overlap report generation: rows, dates, files and run summaries.

#![deny(unsafe_code)]

pub mod analysis;
pub mod dates;
pub mod error;
pub mod row;
pub mod writer;

pub use analysis::{OverlapAnalysis, TopMatch};
pub use dates::{format_date, parse_date, standardize_date};
pub use error::{ReportError, Result};
pub use row::{OverlapRow, build_rows};
pub use writer::{output_path, sanitize_output_tag, write_csv, write_json};
