#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Daily presence classification.
//!
//! Reduces a stream of [`ExtractedPoint`]s to one bit per calendar day:
//! `true` if any point that day was inside the territory. The reduction
//! is a fold into [`DailyClassification`], whose [`merge`] is a logical
//! OR per day, so batches (e.g. one per input file) can be aggregated
//! independently and combined in any order.
//!
//! [`merge`]: DailyClassification::merge

pub mod classification;

pub use classification::DailyClassification;

use residency_boundary::PreparedBoundary;
use residency_timeline::{ExtractedPoint, parse_day_key};

/// Something that can decide whether a point is inside the territory.
pub trait Territory {
    /// Returns `true` if `(longitude, latitude)` is inside.
    fn contains(&self, longitude: f64, latitude: f64) -> bool;
}

impl Territory for PreparedBoundary {
    fn contains(&self, longitude: f64, latitude: f64) -> bool {
        Self::contains(self, longitude, latitude)
    }
}

impl<T: Territory + ?Sized> Territory for &T {
    fn contains(&self, longitude: f64, latitude: f64) -> bool {
        (**self).contains(longitude, latitude)
    }
}

impl<T: Territory + ?Sized> Territory for std::sync::Arc<T> {
    fn contains(&self, longitude: f64, latitude: f64) -> bool {
        (**self).contains(longitude, latitude)
    }
}

/// Points and records dropped on the way to a classification.
///
/// Purely informational: none of these affect any day's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SkipCounts {
    /// Points without a usable position.
    pub missing_position: u64,
    /// Points without a timestamp.
    pub missing_timestamp: u64,
    /// Points whose timestamp could not be parsed.
    pub bad_timestamp: u64,
    /// Records whose `geo:` URI had non-numeric coordinates.
    pub bad_coordinates: u64,
    /// Document items that were not location records.
    pub unrecognized_records: u64,
}

impl SkipCounts {
    /// Sum of all counters.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.missing_position
            + self.missing_timestamp
            + self.bad_timestamp
            + self.bad_coordinates
            + self.unrecognized_records
    }

    /// Adds `other` into `self`.
    pub const fn absorb(&mut self, other: Self) {
        self.missing_position += other.missing_position;
        self.missing_timestamp += other.missing_timestamp;
        self.bad_timestamp += other.bad_timestamp;
        self.bad_coordinates += other.bad_coordinates;
        self.unrecognized_records += other.unrecognized_records;
    }
}

/// Result of folding one or more batches of points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// One entry per observed day.
    pub classification: DailyClassification,
    /// What was dropped along the way.
    pub skipped: SkipCounts,
}

impl Aggregation {
    /// Combines two aggregations. Classifications merge with OR; skip
    /// counts add.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.classification = self.classification.merge(other.classification);
        self.skipped.absorb(other.skipped);
        self
    }
}

/// Folds points into a per-day classification.
///
/// For each point: skip it if it lacks a position or timestamp or the
/// timestamp does not parse; otherwise record its day, testing
/// containment only while the day is not yet known to be inside.
pub fn aggregate<'a, I, T>(points: I, territory: &T) -> Aggregation
where
    I: IntoIterator<Item = &'a ExtractedPoint>,
    T: Territory + ?Sized,
{
    let mut aggregation = Aggregation::default();

    for point in points {
        let Some((latitude, longitude)) = point.position() else {
            aggregation.skipped.missing_position += 1;
            continue;
        };
        let Some(timestamp) = point.timestamp.as_deref() else {
            aggregation.skipped.missing_timestamp += 1;
            continue;
        };
        let Some(day) = parse_day_key(timestamp) else {
            log::debug!("Skipping point with unparseable timestamp {timestamp:?}");
            aggregation.skipped.bad_timestamp += 1;
            continue;
        };

        aggregation
            .classification
            .observe(day, || territory.contains(longitude, latitude));
    }

    aggregation
}

/// Aggregates several batches independently and merges the results.
///
/// The outcome does not depend on the order of `batches`.
pub fn aggregate_all<'a, B, T>(batches: B, territory: &T) -> Aggregation
where
    B: IntoIterator<Item = &'a [ExtractedPoint]>,
    T: Territory + ?Sized,
{
    batches
        .into_iter()
        .map(|batch| aggregate(batch, territory))
        .fold(Aggregation::default(), Aggregation::merge)
}
