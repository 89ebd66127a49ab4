//! Audit pipeline: files → points → daily classification → result.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::Datelike as _;
use residency_audit::{
    Adjustments, AuditResult, LedgerEntry, MonthlyCount, available_years, default_audit_year,
    ledger, monthly_breakdown, score,
};
use residency_boundary::BoundaryProvider;
use residency_presence::{Aggregation, SkipCounts, Territory, aggregate_all};
use residency_timeline::{ExtractedPoint, extract, parse_day_key, parse_document};
use serde::Serialize;

use crate::PipelineError;

/// What to audit.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    /// Location-history export files.
    pub files: Vec<PathBuf>,
    /// Year to audit. Defaults to the latest year in the data.
    pub audit_year: Option<i32>,
    /// Manual corrections for the two prior years.
    pub adjustments: Adjustments,
    /// Year for the monthly breakdown. Defaults to the audit year.
    pub chart_year: Option<i32>,
}

/// Points extracted from the input files, one batch per readable file.
#[derive(Debug, Default)]
pub struct LoadedInput {
    /// Extracted points, grouped by file.
    pub batches: Vec<Vec<ExtractedPoint>>,
    /// Records dropped during document parsing and extraction.
    pub skipped: SkipCounts,
    /// Files that were not valid location-history documents.
    pub rejected_files: Vec<PathBuf>,
}

impl LoadedInput {
    /// Total number of extracted points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}

/// Everything produced by one audit run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Score and verdict for the audit year.
    pub result: AuditResult,
    /// Day-by-day ledger for the audit year.
    pub ledger: Vec<LedgerEntry>,
    /// Year covered by [`Self::monthly`].
    pub chart_year: i32,
    /// Monthly inside/international counts for the chart year.
    pub monthly: Vec<MonthlyCount>,
    /// Years present in the data.
    pub available_years: Vec<i32>,
    /// Number of distinct days observed across all years.
    pub observed_days: usize,
    /// Records and points that did not contribute.
    pub skipped: SkipCounts,
    /// Input files that could not be parsed.
    pub rejected_files: Vec<PathBuf>,
}

/// Reads every file and extracts its points.
///
/// A file that is not a valid document is logged, recorded in
/// [`LoadedInput::rejected_files`] and skipped. Records with malformed
/// coordinates are counted and skipped.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if a file cannot be read.
pub async fn load_points(files: &[PathBuf]) -> Result<LoadedInput, PipelineError> {
    let mut input = LoadedInput::default();

    for path in files {
        let bytes = tokio::fs::read(path).await.map_err(|e| PipelineError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        match extract_document(&bytes) {
            Ok((points, skipped)) => {
                log::info!("{}: {} points", path.display(), points.len());
                input.batches.push(points);
                input.skipped.absorb(skipped);
            }
            Err(e) => {
                log::warn!("Skipping {}: {e}", path.display());
                input.rejected_files.push(path.clone());
            }
        }
    }

    Ok(input)
}

/// Parses one document and extracts a point from every record.
///
/// # Errors
///
/// Returns the document error if the bytes are not a location-history
/// document.
pub fn extract_document(
    bytes: &[u8],
) -> Result<(Vec<ExtractedPoint>, SkipCounts), residency_timeline::DocumentError> {
    let document = parse_document(bytes)?;

    let mut skipped = SkipCounts {
        unrecognized_records: document.rejected,
        ..SkipCounts::default()
    };

    let points = document
        .events
        .iter()
        .filter_map(|event| match extract(event) {
            Ok(point) => Some(point),
            Err(e) => {
                log::debug!("Skipping record: {e}");
                skipped.bad_coordinates += 1;
                None
            }
        })
        .collect();

    Ok((points, skipped))
}

/// Classifies every loaded batch and merges the results.
pub fn classify<T: Territory + ?Sized>(input: &LoadedInput, territory: &T) -> Aggregation {
    let mut aggregation = aggregate_all(input.batches.iter().map(Vec::as_slice), territory);
    aggregation.skipped.absorb(input.skipped);
    aggregation
}

/// Years with at least one usable point, without consulting the boundary.
#[must_use]
pub fn observed_years(input: &LoadedInput) -> Vec<i32> {
    input
        .batches
        .iter()
        .flatten()
        .filter(|point| point.position().is_some())
        .filter_map(|point| parse_day_key(point.timestamp.as_deref()?))
        .map(|day| day.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Scores a finished aggregation.
#[must_use]
pub fn build_report(
    aggregation: Aggregation,
    request: &AuditRequest,
    rejected_files: Vec<PathBuf>,
) -> AuditReport {
    let classification = &aggregation.classification;

    let audit_year = request
        .audit_year
        .unwrap_or_else(|| default_audit_year(classification, chrono::Utc::now().year()));
    let chart_year = request.chart_year.unwrap_or(audit_year);

    AuditReport {
        result: score(classification, audit_year, request.adjustments),
        ledger: ledger(classification, audit_year),
        chart_year,
        monthly: monthly_breakdown(classification, chart_year),
        available_years: available_years(classification),
        observed_days: classification.len(),
        skipped: aggregation.skipped,
        rejected_files,
    }
}

/// Runs a full audit.
///
/// Input files are read before the boundary is requested, so unreadable
/// input fails fast without a download.
///
/// # Errors
///
/// Returns [`PipelineError::BoundaryUnavailable`] if the boundary cannot
/// be loaded, or [`PipelineError::Io`] if an input file cannot be read.
pub async fn run_audit(
    provider: &BoundaryProvider,
    request: &AuditRequest,
) -> Result<AuditReport, PipelineError> {
    let input = load_points(&request.files).await?;
    log::info!(
        "Loaded {} points from {} files",
        input.point_count(),
        input.batches.len()
    );

    let boundary = provider.get().await?;
    let aggregation = classify(&input, &boundary);

    if aggregation.skipped.total() > 0 {
        log::info!(
            "Skipped {} records/points without a usable position or time",
            aggregation.skipped.total()
        );
    }

    Ok(build_report(aggregation, request, input.rejected_files))
}

/// Resolves the ledger output path. A path with an extension is used as
/// given; anything else is treated as a directory.
#[must_use]
pub fn ledger_path_for(path: &Path, audit_year: i32) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.join(format!("residency_ledger_{audit_year}.csv"))
    }
}
