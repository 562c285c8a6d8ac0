//! Loaders for the source, target and gold-pair CSV files.
//!
//! Headers are checked up front so a missing column fails the load before
//! any row is read. Cells are trimmed and empty cells become empty strings.

use std::path::Path;

use csv::{Reader, StringRecord};
use overlap_match::{GoldPair, normalize_drug_name};
use overlap_model::{SourceDrug, Sponsor, TargetDrug};
use serde::de::DeserializeOwned;

use crate::error::{IngestError, Result};

pub const SOURCE_COLUMNS: [&str; 3] = ["Drug Name", "Indication", "Date of Approval"];

pub const TARGET_COLUMNS: [&str; 4] = [
    "Generic Name",
    "Trade Name",
    "Approved Labeled Indication",
    "Marketing Approval Date",
];

pub const GOLD_COLUMNS: [&str; 2] = ["Source Name", "Target Generic Name"];

/// CSV row structure for the domestic registry.
#[derive(Debug, serde::Deserialize)]
struct SourceCsvRow {
    #[serde(rename = "Drug Name")]
    name: String,
    #[serde(rename = "Indication")]
    indication: String,
    #[serde(rename = "Date of Approval")]
    approval_date: String,
}

/// CSV row structure for the orphan-drug registry.
#[derive(Debug, serde::Deserialize)]
struct TargetCsvRow {
    #[serde(rename = "Generic Name")]
    generic_name: String,
    #[serde(rename = "Trade Name")]
    trade_name: String,
    #[serde(rename = "Approved Labeled Indication")]
    indication: String,
    #[serde(rename = "Marketing Approval Date")]
    approval_date: String,
    #[serde(rename = "Sponsor Company", default)]
    sponsor_company: String,
    #[serde(rename = "Sponsor State", default)]
    sponsor_state: String,
    #[serde(rename = "Sponsor Country", default)]
    sponsor_country: String,
}

#[derive(Debug, serde::Deserialize)]
struct GoldCsvRow {
    #[serde(rename = "Source Name")]
    source_name: String,
    #[serde(rename = "Target Generic Name")]
    target_generic: String,
}

/// Load the domestic registry and attach normalized names.
///
/// # Errors
///
/// Returns an error if the file is missing, lacks a required column, or a
/// row cannot be parsed.
pub fn load_source_registry(path: &Path) -> Result<Vec<SourceDrug>> {
    let rows: Vec<SourceCsvRow> = read_rows(path, &SOURCE_COLUMNS)?;
    let drugs: Vec<SourceDrug> = rows
        .into_iter()
        .map(|row| SourceDrug {
            normalized_name: normalize_drug_name(&row.name),
            name: row.name,
            indication: row.indication,
            approval_date: row.approval_date,
        })
        .collect();
    tracing::info!(path = %path.display(), count = drugs.len(), "Loaded source registry");
    Ok(drugs)
}

/// Load the orphan-drug registry and attach normalized generic and trade names.
///
/// # Errors
///
/// Returns an error if the file is missing, lacks a required column, or a
/// row cannot be parsed.
pub fn load_target_registry(path: &Path) -> Result<Vec<TargetDrug>> {
    let rows: Vec<TargetCsvRow> = read_rows(path, &TARGET_COLUMNS)?;
    let drugs: Vec<TargetDrug> = rows
        .into_iter()
        .map(|row| {
            let sponsor = Sponsor {
                company: row.sponsor_company,
                state: row.sponsor_state,
                country: row.sponsor_country,
            };
            let has_sponsor = !(sponsor.company.is_empty()
                && sponsor.state.is_empty()
                && sponsor.country.is_empty());
            TargetDrug {
                generic_normalized: normalize_drug_name(&row.generic_name),
                trade_normalized: normalize_drug_name(&row.trade_name),
                generic_name: row.generic_name,
                trade_name: row.trade_name,
                indication: row.indication,
                approval_date: row.approval_date,
                sponsor: has_sponsor.then_some(sponsor),
            }
        })
        .collect();
    tracing::info!(path = %path.display(), count = drugs.len(), "Loaded target registry");
    Ok(drugs)
}

/// Load known true pairs for threshold evaluation.
///
/// # Errors
///
/// Returns an error if the file is missing, lacks a required column, or a
/// row cannot be parsed.
pub fn load_gold_pairs(path: &Path) -> Result<Vec<GoldPair>> {
    let rows: Vec<GoldCsvRow> = read_rows(path, &GOLD_COLUMNS)?;
    Ok(rows
        .into_iter()
        .filter(|row| !row.source_name.is_empty())
        .map(|row| GoldPair::new(row.source_name, row.target_generic))
        .collect())
}

fn read_rows<T: DeserializeOwned>(path: &Path, required: &[&'static str]) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let csv_error = |source: csv::Error| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let headers = reader.headers().map_err(csv_error)?.clone();
    check_columns(&headers, required, path)?;
    tracing::debug!(path = %path.display(), columns = headers.len(), "Validated registry header");

    deserialize_rows(&mut reader, &headers).map_err(csv_error)
}

fn check_columns(headers: &StringRecord, required: &[&'static str], path: &Path) -> Result<()> {
    match required
        .iter()
        .copied()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        Some(column) => Err(IngestError::MissingColumn {
            column,
            path: path.to_path_buf(),
        }),
        None => Ok(()),
    }
}

/// Short rows are padded with empty cells so missing values degrade to "".
fn deserialize_rows<T: DeserializeOwned, R: std::io::Read>(
    reader: &mut Reader<R>,
    headers: &StringRecord,
) -> csv::Result<Vec<T>> {
    let mut rows = Vec::new();
    for record in reader.records() {
        let mut record = record?;
        while record.len() < headers.len() {
            record.push_field("");
        }
        rows.push(record.deserialize(Some(headers))?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_first_missing_column() {
        let headers = StringRecord::from(vec!["Drug Name", "Date of Approval"]);
        let err = check_columns(&headers, &SOURCE_COLUMNS, Path::new("source.csv"))
            .expect_err("missing indication");
        assert!(matches!(
            err,
            IngestError::MissingColumn { column: "Indication", .. }
        ));
    }
}
