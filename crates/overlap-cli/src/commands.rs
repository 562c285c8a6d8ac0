use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use overlap_ingest::{load_gold_pairs, load_source_registry, load_target_registry};
use overlap_match::{Evaluation, MatchOptions, OverlapMatcher, sweep};
use overlap_model::{SourceDrug, TargetDrug};
use overlap_report::{OverlapAnalysis, OverlapRow, build_rows, output_path, write_csv, write_json};
use tracing::{info, info_span, warn};

use crate::cli::{RegistryArgs, RunArgs, SweepArgs};
use crate::progress::BarObserver;

/// What a `run` produced.
pub struct RunOutcome {
    pub threshold: u8,
    pub rows: Vec<OverlapRow>,
    pub analysis: OverlapAnalysis,
    pub reports: Vec<PathBuf>,
}

pub fn run_overlap(args: &RunArgs) -> Result<RunOutcome> {
    let run_span = info_span!("run", threshold = args.threshold);
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let (sources, targets) = load_registries(&args.registries)?;

    let options = MatchOptions {
        base_threshold: args.threshold,
        assignment: args.assignment.into(),
    };
    let matcher = OverlapMatcher::with_options(&options);
    let observer = BarObserver::new()?;
    let matches = matcher
        .find_overlaps_with_progress(&sources, &targets, &observer)
        .context("match registries")?;

    let rows = build_rows(&matches);
    let analysis = OverlapAnalysis::from_rows(&rows, matcher.profile());

    let mut reports = Vec::new();
    if rows.is_empty() {
        warn!("No overlapping drugs found; no report written");
    } else {
        let csv_path = output_path(&args.output_dir, args.threshold, args.output_tag.as_deref());
        if args.format.writes_csv() {
            write_csv(&rows, &csv_path).context("write CSV report")?;
            reports.push(csv_path.clone());
        }
        if args.format.writes_json() {
            let json_path = csv_path.with_extension("json");
            write_json(&rows, &json_path).context("write JSON report")?;
            reports.push(json_path);
        }
    }

    info!(
        matches = rows.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Run complete"
    );
    Ok(RunOutcome {
        threshold: args.threshold,
        rows,
        analysis,
        reports,
    })
}

pub fn run_sweep(args: &SweepArgs) -> Result<Vec<Evaluation>> {
    let sweep_span = info_span!("sweep", thresholds = ?args.thresholds);
    let _sweep_guard = sweep_span.enter();

    let (sources, targets) = load_registries(&args.registries)?;
    let gold = load_gold_pairs(&args.gold)
        .with_context(|| format!("load gold pairs from {}", args.gold.display()))?;
    info!(pairs = gold.len(), "Loaded gold pairs");

    let options = MatchOptions {
        assignment: args.assignment.into(),
        ..MatchOptions::default()
    };
    sweep(&sources, &targets, &gold, &args.thresholds, &options).context("evaluate thresholds")
}

fn load_registries(args: &RegistryArgs) -> Result<(Vec<SourceDrug>, Vec<TargetDrug>)> {
    let sources = load_source_registry(&args.source)
        .with_context(|| format!("load source registry {}", args.source.display()))?;
    let targets = load_target_registry(&args.target)
        .with_context(|| format!("load target registry {}", args.target.display()))?;
    Ok((sources, targets))
}
