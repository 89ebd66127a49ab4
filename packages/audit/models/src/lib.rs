#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Substantial Presence Test types.
//!
//! [`AuditResult`] is the outcome of scoring one audit year. The ledger
//! and monthly breakdown types describe the per-day data behind it in a
//! form suited to export and charting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Largest accepted manual correction for one year.
pub const MAX_ADJUSTMENT_DAYS: u16 = 366;

/// Residency verdict for an audit year.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Fewer than 31 days present in the audit year.
    #[serde(rename = "NON_RESIDENT_UNDER_31")]
    #[strum(serialize = "NON_RESIDENT_UNDER_31")]
    NonResidentUnder31,
    /// At least 31 days, but a weighted score below 183.
    NonResidentLowScore,
    /// At least 31 days and a weighted score of 183 or more.
    Resident,
}

/// Outcome of scoring one audit year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// The year being audited.
    pub audit_year: i32,
    /// Inside days in the audit year.
    pub current_year_days: u32,
    /// Inside days in the previous year, including the manual correction.
    pub prior_year_days: u32,
    /// Inside days two years back, including the manual correction.
    pub prior_prior_year_days: u32,
    /// `current + prior / 3 + prior_prior / 6`.
    pub weighted_score: f64,
    /// Residency verdict.
    pub verdict: Verdict,
}

/// A manual correction outside the accepted range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} correction of {value} days exceeds {MAX_ADJUSTMENT_DAYS}")]
pub struct AdjustmentError {
    /// Which correction was rejected.
    pub field: &'static str,
    /// The rejected value.
    pub value: u32,
}

/// Manual day-count corrections for the two years before the audit year.
///
/// Used to account for days missing from the location data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustments {
    prior_year: u16,
    prior_prior_year: u16,
}

impl Adjustments {
    /// Validates and builds a pair of corrections.
    ///
    /// # Errors
    ///
    /// Returns [`AdjustmentError`] if either value exceeds
    /// [`MAX_ADJUSTMENT_DAYS`].
    pub fn new(prior_year: u32, prior_prior_year: u32) -> Result<Self, AdjustmentError> {
        Ok(Self {
            prior_year: checked("prior year", prior_year)?,
            prior_prior_year: checked("prior-prior year", prior_prior_year)?,
        })
    }

    /// Correction for the year before the audit year.
    #[must_use]
    pub fn prior_year(&self) -> u32 {
        u32::from(self.prior_year)
    }

    /// Correction for two years before the audit year.
    #[must_use]
    pub fn prior_prior_year(&self) -> u32 {
        u32::from(self.prior_prior_year)
    }
}

fn checked(field: &'static str, value: u32) -> Result<u16, AdjustmentError> {
    u16::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_ADJUSTMENT_DAYS)
        .ok_or(AdjustmentError { field, value })
}

/// Presence status of one day.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    /// At least one point that day was inside the territory.
    Inside,
    /// No point that day was inside the territory.
    International,
}

impl From<bool> for DayStatus {
    fn from(inside: bool) -> Self {
        if inside { Self::Inside } else { Self::International }
    }
}

/// One row of the day-by-day ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LedgerEntry {
    /// Calendar day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Presence status.
    pub status: DayStatus,
}

/// Inside and international day counts for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// Month number, 1 = January.
    pub month: u32,
    /// Upper-case English month name (e.g. `"JANUARY"`).
    pub label: String,
    /// Days classified inside.
    pub inside: u32,
    /// Days classified international.
    pub international: u32,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn verdict_renders_screaming_snake_case() {
        assert_eq!(Verdict::NonResidentUnder31.to_string(), "NON_RESIDENT_UNDER_31");
        assert_eq!(Verdict::Resident.as_ref(), "RESIDENT");
        assert_eq!(
            Verdict::from_str("NON_RESIDENT_LOW_SCORE").unwrap(),
            Verdict::NonResidentLowScore
        );
    }

    #[test]
    fn day_status_from_bool() {
        assert_eq!(DayStatus::from(true), DayStatus::Inside);
        assert_eq!(DayStatus::from(false).to_string(), "INTERNATIONAL");
    }

    #[test]
    fn accepts_adjustments_in_range() {
        let adj = Adjustments::new(0, 366).unwrap();
        assert_eq!(adj.prior_year(), 0);
        assert_eq!(adj.prior_prior_year(), 366);
    }

    #[test]
    fn rejects_adjustments_out_of_range() {
        assert_eq!(
            Adjustments::new(367, 0),
            Err(AdjustmentError {
                field: "prior year",
                value: 367,
            })
        );
        assert!(Adjustments::new(0, 100_000).is_err());
    }
}
