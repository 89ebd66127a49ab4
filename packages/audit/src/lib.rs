#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Substantial Presence Test scoring.
//!
//! Works on a finished [`DailyClassification`]. [`score`] produces the
//! verdict for an audit year; [`ledger`] and [`monthly_breakdown`] expose
//! the per-day data behind it.

pub mod breakdown;
pub mod score;

pub use breakdown::{available_years, default_audit_year, ledger, monthly_breakdown};
pub use residency_audit_models::{
    AdjustmentError, Adjustments, AuditResult, DayStatus, LedgerEntry, MonthlyCount, Verdict,
};
pub use residency_presence::DailyClassification;
pub use score::{MIN_CURRENT_YEAR_DAYS, RESIDENT_THRESHOLD, score, verdict_for};
