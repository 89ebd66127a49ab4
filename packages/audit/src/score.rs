//! Weighted day count and residency verdict.

use residency_audit_models::{Adjustments, AuditResult, Verdict};
use residency_presence::DailyClassification;

/// Minimum inside days in the audit year. Below this the verdict is
/// non-resident whatever the weighted score.
pub const MIN_CURRENT_YEAR_DAYS: u32 = 31;

/// Weighted score at or above which the verdict is resident.
pub const RESIDENT_THRESHOLD: f64 = 183.0;

/// Scores `audit_year`.
///
/// Counts inside days for the audit year and the two years before it,
/// adds the manual corrections to the prior years, and weights them
/// 1, 1/3 and 1/6. A prior year that falls outside the `i32` range has
/// no inside days.
#[must_use]
pub fn score(
    classification: &DailyClassification,
    audit_year: i32,
    adjustments: Adjustments,
) -> AuditResult {
    let inside_days_before = |years_back: i32| {
        audit_year
            .checked_sub(years_back)
            .map_or(0, |year| classification.inside_days(year))
    };

    let current_year_days = classification.inside_days(audit_year);
    let prior_year_days = inside_days_before(1) + adjustments.prior_year();
    let prior_prior_year_days = inside_days_before(2) + adjustments.prior_prior_year();

    let weighted_score = weighted_score(current_year_days, prior_year_days, prior_prior_year_days);
    let verdict = verdict_for(current_year_days, weighted_score);

    log::debug!(
        "Audit {audit_year}: {current_year_days} + {prior_year_days}/3 + \
         {prior_prior_year_days}/6 = {weighted_score:.2} -> {verdict}"
    );

    AuditResult {
        audit_year,
        current_year_days,
        prior_year_days,
        prior_prior_year_days,
        weighted_score,
        verdict,
    }
}

fn weighted_score(current: u32, prior: u32, prior_prior: u32) -> f64 {
    f64::from(current) + f64::from(prior) / 3.0 + f64::from(prior_prior) / 6.0
}

/// Applies the verdict policy. The 31-day floor is checked first.
#[must_use]
pub fn verdict_for(current_year_days: u32, weighted_score: f64) -> Verdict {
    if current_year_days < MIN_CURRENT_YEAR_DAYS {
        Verdict::NonResidentUnder31
    } else if weighted_score >= RESIDENT_THRESHOLD {
        Verdict::Resident
    } else {
        Verdict::NonResidentLowScore
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};

    use super::*;

    /// `count` consecutive days from January 1st of `year`, all with the
    /// same status.
    fn days(year: i32, count: u64, inside: bool) -> DailyClassification {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        (0..count)
            .map(|offset| (start.checked_add_days(Days::new(offset)).unwrap(), inside))
            .collect()
    }

    #[test]
    fn floor_overrides_high_score() {
        let data = days(2025, 30, true)
            .merge(days(2024, 366, true))
            .merge(days(2023, 365, true));
        let adjustments = Adjustments::new(366, 366).unwrap();
        let result = score(&data, 2025, adjustments);
        assert_eq!(result.current_year_days, 30);
        assert!(result.weighted_score > 183.0);
        assert_eq!(result.verdict, Verdict::NonResidentUnder31);
    }

    #[test]
    fn floor_overrides_score_of_400() {
        assert_eq!(verdict_for(30, 400.0), Verdict::NonResidentUnder31);
    }

    #[test]
    fn thirty_one_days_alone_is_low_score() {
        let result = score(&days(2025, 31, true), 2025, Adjustments::default());
        assert_eq!(result.current_year_days, 31);
        assert!((result.weighted_score - 31.0).abs() < f64::EPSILON);
        assert_eq!(result.verdict, Verdict::NonResidentLowScore);
    }

    #[test]
    fn threshold_is_inclusive() {
        let result = score(&days(2025, 183, true), 2025, Adjustments::default());
        assert!((result.weighted_score - 183.0).abs() < f64::EPSILON);
        assert_eq!(result.verdict, Verdict::Resident);

        let result = score(&days(2025, 182, true), 2025, Adjustments::default());
        assert_eq!(result.verdict, Verdict::NonResidentLowScore);
    }

    #[test]
    fn adjustments_add_to_prior_years() {
        let data = days(2024, 50, true).merge(days(2025, 40, true));
        let result = score(&data, 2025, Adjustments::new(10, 0).unwrap());
        assert_eq!(result.prior_year_days, 60);
        assert_eq!(result.prior_prior_year_days, 0);
        assert!((result.weighted_score - (40.0 + 20.0)).abs() < 1e-9);
    }

    #[test]
    fn weights_prior_years() {
        let data = days(2025, 120, true)
            .merge(days(2024, 120, true))
            .merge(days(2023, 120, true));
        let result = score(&data, 2025, Adjustments::default());
        // 120 + 40 + 20
        assert!((result.weighted_score - 180.0).abs() < 1e-9);
        assert_eq!(result.verdict, Verdict::NonResidentLowScore);
    }

    #[test]
    fn outside_days_do_not_count() {
        let data = days(2025, 200, false);
        let result = score(&data, 2025, Adjustments::default());
        assert_eq!(result.current_year_days, 0);
        assert_eq!(result.verdict, Verdict::NonResidentUnder31);
    }

    #[test]
    fn missing_year_scores_zero() {
        let result = score(&DailyClassification::new(), 2030, Adjustments::default());
        assert_eq!(result.current_year_days, 0);
        assert_eq!(result.prior_year_days, 0);
        assert_eq!(result.prior_prior_year_days, 0);
        assert!(result.weighted_score.abs() < f64::EPSILON);
        assert_eq!(result.verdict, Verdict::NonResidentUnder31);
    }

    #[test]
    fn extreme_audit_years_do_not_overflow() {
        let result = score(&DailyClassification::new(), i32::MIN, Adjustments::new(5, 7).unwrap());
        assert_eq!(result.audit_year, i32::MIN);
        assert_eq!(result.current_year_days, 0);
        assert_eq!(result.prior_year_days, 5);
        assert_eq!(result.prior_prior_year_days, 7);
        assert_eq!(result.verdict, Verdict::NonResidentUnder31);

        let result = score(&DailyClassification::new(), i32::MIN + 1, Adjustments::default());
        assert_eq!(result.prior_prior_year_days, 0);
    }
}
