//! Plain-text rendering of audit results.

use std::fmt::Write as _;

use residency_audit::{AuditResult, MonthlyCount, Verdict};
use residency_presence::SkipCounts;

use crate::pipeline::AuditReport;

/// One-line verdict headline.
#[must_use]
pub fn headline(result: &AuditResult) -> String {
    match result.verdict {
        Verdict::NonResidentUnder31 => format!(
            "NON-RESIDENT ALIEN (UNDER 31 DAYS IN {})",
            result.audit_year
        ),
        Verdict::NonResidentLowScore => format!(
            "NON-RESIDENT ALIEN (WEIGHTED SCORE: {:.1})",
            result.weighted_score
        ),
        Verdict::Resident => format!(
            "US TAX RESIDENT (WEIGHTED SCORE: {:.1})",
            result.weighted_score
        ),
    }
}

/// Day counts and score, one per line.
#[must_use]
pub fn metrics(result: &AuditResult) -> String {
    let year = result.audit_year;
    let mut out = String::new();
    let _ = writeln!(out, "  {year} DAYS:   {:>6}", result.current_year_days);
    let _ = writeln!(
        out,
        "  {} TOTAL:  {:>6}",
        year.saturating_sub(1),
        result.prior_year_days
    );
    let _ = writeln!(
        out,
        "  {} TOTAL:  {:>6}",
        year.saturating_sub(2),
        result.prior_prior_year_days
    );
    let _ = writeln!(out, "  SPT SCORE:  {:>6.1}", result.weighted_score);
    out
}

/// Monthly inside/international table.
#[must_use]
pub fn monthly_table(year: i32, months: &[MonthlyCount]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "TRAVEL PATTERN {year}");
    let _ = writeln!(out, "  {:<10} {:>7} {:>14}", "MONTH", "INSIDE", "INTERNATIONAL");
    for month in months {
        let _ = writeln!(
            out,
            "  {:<10} {:>7} {:>14}",
            month.label, month.inside, month.international
        );
    }
    out
}

/// Summary of skipped input.
#[must_use]
pub fn skipped_summary(skipped: &SkipCounts) -> Option<String> {
    if skipped.total() == 0 {
        return None;
    }
    Some(format!(
        "Skipped {} entries ({} without position, {} without time, {} bad time, \
         {} bad coordinates, {} unrecognized)",
        skipped.total(),
        skipped.missing_position,
        skipped.missing_timestamp,
        skipped.bad_timestamp,
        skipped.bad_coordinates,
        skipped.unrecognized_records,
    ))
}

/// Full text report.
#[must_use]
pub fn report(report: &AuditReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "AUDIT RESULTS");
    let _ = writeln!(out, "{}", headline(&report.result));
    let _ = writeln!(out);
    out.push_str(&metrics(&report.result));
    let _ = writeln!(out);
    out.push_str(&monthly_table(report.chart_year, &report.monthly));

    let years: Vec<String> = report.available_years.iter().map(ToString::to_string).collect();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} days observed; years in data: {}",
        report.observed_days,
        if years.is_empty() { "none".to_string() } else { years.join(", ") }
    );
    if let Some(skipped) = skipped_summary(&report.skipped) {
        let _ = writeln!(out, "{skipped}");
    }
    for file in &report.rejected_files {
        let _ = writeln!(out, "Ignored unreadable file: {}", file.display());
    }
    out
}
