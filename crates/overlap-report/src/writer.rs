//! Report persistence.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ReportError, Result};
use crate::row::{CSV_HEADERS, OverlapRow};

static UNSAFE_TAG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("Invalid tag regex"));

/// Filesystem-safe report suffix; falls back to the threshold.
pub fn sanitize_output_tag(tag: Option<&str>, threshold: u8) -> String {
    let cleaned = tag
        .map(|tag| {
            UNSAFE_TAG_CHARS
                .replace_all(tag.trim(), "-")
                .trim_matches(['-', '.', '_'])
                .to_string()
        })
        .unwrap_or_default();
    if cleaned.is_empty() {
        threshold.to_string()
    } else {
        cleaned
    }
}

/// `<dir>/overlap-<tag>.csv`.
pub fn output_path(dir: &Path, threshold: u8, tag: Option<&str>) -> PathBuf {
    dir.join(format!(
        "overlap-{}.csv",
        sanitize_output_tag(tag, threshold)
    ))
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| ReportError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Write rows as CSV with a header line, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn write_csv(rows: &[OverlapRow], path: &Path) -> Result<()> {
    create_parent(path)?;
    let csv_error = |source: csv::Error| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer.write_record(CSV_HEADERS).map_err(csv_error)?;
    for row in rows {
        writer.write_record(row.csv_record()).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Wrote CSV report");
    Ok(())
}

/// Write rows as a pretty-printed JSON array, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn write_json(rows: &[OverlapRow], path: &Path) -> Result<()> {
    create_parent(path)?;
    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), rows).map_err(|source| {
        ReportError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Wrote JSON report");
    Ok(())
}
