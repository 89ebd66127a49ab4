//! Per-day ledger and monthly breakdown for export and charting.

use chrono::{Datelike as _, Month};
use residency_audit_models::{DayStatus, LedgerEntry, MonthlyCount};
use residency_presence::DailyClassification;

/// Every observed day of `year`, ascending.
#[must_use]
pub fn ledger(classification: &DailyClassification, year: i32) -> Vec<LedgerEntry> {
    classification
        .days_in_year(year)
        .map(|(date, inside)| LedgerEntry {
            date,
            status: DayStatus::from(inside),
        })
        .collect()
}

/// Inside and international day counts for each month of `year`.
///
/// Always returns twelve entries, January first. Months without data have
/// zero counts.
#[must_use]
pub fn monthly_breakdown(classification: &DailyClassification, year: i32) -> Vec<MonthlyCount> {
    let mut counts: Vec<MonthlyCount> = (1..=12u8)
        .map(|month| {
            let label = Month::try_from(month)
                .map(|m| m.name().to_ascii_uppercase())
                .unwrap_or_default();
            MonthlyCount {
                month: u32::from(month),
                label,
                inside: 0,
                international: 0,
            }
        })
        .collect();

    for (date, inside) in classification.days_in_year(year) {
        let bucket = &mut counts[date.month0() as usize];
        if inside {
            bucket.inside += 1;
        } else {
            bucket.international += 1;
        }
    }

    counts
}

/// Distinct years present in the data, ascending.
#[must_use]
pub fn available_years(classification: &DailyClassification) -> Vec<i32> {
    classification.years()
}

/// The latest year present in the data, or `fallback` if there is none.
#[must_use]
pub fn default_audit_year(classification: &DailyClassification, fallback: i32) -> i32 {
    classification.years().last().copied().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn sample() -> DailyClassification {
        [
            ("2024-02-10", true),
            ("2024-01-05", false),
            ("2024-01-03", true),
            ("2024-12-31", false),
            ("2023-06-01", true),
        ]
        .into_iter()
        .map(|(d, v)| (NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(), v))
        .collect()
    }

    #[test]
    fn ledger_is_sorted_and_limited_to_year() {
        let rows = ledger(&sample(), 2024);
        let dates: Vec<String> = rows.iter().map(|r| r.date.to_string()).collect();
        assert_eq!(dates, ["2024-01-03", "2024-01-05", "2024-02-10", "2024-12-31"]);
        assert_eq!(rows[0].status, DayStatus::Inside);
        assert_eq!(rows[1].status, DayStatus::International);
    }

    #[test]
    fn monthly_buckets_cover_the_year() {
        let months = monthly_breakdown(&sample(), 2024);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].label, "JANUARY");
        assert_eq!((months[0].inside, months[0].international), (1, 1));
        assert_eq!((months[1].inside, months[1].international), (1, 0));
        assert_eq!(months[11].label, "DECEMBER");
        assert_eq!((months[11].inside, months[11].international), (0, 1));
        assert!(months[5..11].iter().all(|m| m.inside == 0 && m.international == 0));
    }

    #[test]
    fn lists_years_and_picks_latest() {
        let data = sample();
        assert_eq!(available_years(&data), vec![2023, 2024]);
        assert_eq!(default_audit_year(&data, 1999), 2024);
        assert_eq!(default_audit_year(&DailyClassification::new(), 1999), 1999);
    }
}
