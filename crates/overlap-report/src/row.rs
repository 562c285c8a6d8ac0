//! Flat report rows built from match records.

use overlap_model::{MatchRecord, MatchType};
use serde::{Serialize, Serializer};

use crate::dates::standardize_date;

/// Column headers of the CSV report, in field order.
pub const CSV_HEADERS: [&str; 16] = [
    "Source Drug Name",
    "Matched Target Name",
    "Source Indication",
    "Target Indication",
    "Source Approval Date",
    "Target Marketing Approval Date",
    "Match Score",
    "Target Generic Name",
    "Target Trade Name",
    "Sponsor Company",
    "Sponsor State",
    "Sponsor Country",
    "Match Type",
    "Rationale",
    "Matched Components",
    "Coverage",
];

/// One line of the overlap report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlapRow {
    pub source_name: String,
    pub matched_name: String,
    pub source_indication: String,
    pub target_indication: String,
    /// `MM/DD/YYYY`, empty when the raw date was missing or unparseable.
    pub source_approval_date: String,
    pub target_approval_date: String,
    /// Unrounded; two decimals only when written out.
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
    pub target_generic: String,
    pub target_trade: String,
    pub sponsor_company: String,
    pub sponsor_state: String,
    pub sponsor_country: String,
    pub match_type: MatchType,
    pub rationale: String,
    pub matched_components: Vec<String>,
    pub coverage: Option<f64>,
}

impl OverlapRow {
    pub fn from_record(record: &MatchRecord) -> Self {
        let sponsor = record.target_sponsor.clone().unwrap_or_default();
        Self {
            source_name: record.source_name.clone(),
            matched_name: record.matched_name.clone(),
            source_indication: record.source_indication.clone(),
            target_indication: record.target_indication.clone(),
            source_approval_date: standardize_date(&record.source_approval_date),
            target_approval_date: standardize_date(&record.target_approval_date),
            score: record.score,
            target_generic: record.target_generic.clone(),
            target_trade: record.target_trade.clone(),
            sponsor_company: sponsor.company,
            sponsor_state: sponsor.state,
            sponsor_country: sponsor.country,
            match_type: record.match_type,
            rationale: record.rationale.clone(),
            matched_components: record.matched_components.clone().unwrap_or_default(),
            coverage: record.coverage,
        }
    }

    /// Coverage as a whole percentage, e.g. `"50%"`; empty when not a combination match.
    pub fn coverage_label(&self) -> String {
        self.coverage
            .map(|coverage| format!("{:.0}%", coverage * 100.0))
            .unwrap_or_default()
    }

    pub(crate) fn csv_record(&self) -> [String; 16] {
        [
            self.source_name.clone(),
            self.matched_name.clone(),
            self.source_indication.clone(),
            self.target_indication.clone(),
            self.source_approval_date.clone(),
            self.target_approval_date.clone(),
            format!("{:.2}", self.score),
            self.target_generic.clone(),
            self.target_trade.clone(),
            self.sponsor_company.clone(),
            self.sponsor_state.clone(),
            self.sponsor_country.clone(),
            self.match_type.to_string(),
            self.rationale.clone(),
            self.matched_components.join("; "),
            self.coverage_label(),
        ]
    }
}

/// Round a score to two decimals for output.
pub(crate) fn serialize_score<S>(score: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64((score * 100.0).round() / 100.0)
}

/// Report rows ordered by score, highest first. Equal scores keep source order.
pub fn build_rows(records: &[MatchRecord]) -> Vec<OverlapRow> {
    let mut ordered: Vec<&MatchRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.source_index);
    let mut rows: Vec<OverlapRow> = ordered.into_iter().map(OverlapRow::from_record).collect();
    rows.sort_by(|a, b| b.score.total_cmp(&a.score));
    rows
}
