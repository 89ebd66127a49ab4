//! The per-day classification map and its merge law.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::{Datelike, NaiveDate};

/// Calendar day → whether any point that day was inside the territory.
///
/// Days are kept in ascending order. A day set to `true` stays `true`:
/// the only way to change a value is [`Self::observe`] or [`Self::merge`],
/// both of which OR the new observation into the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyClassification {
    days: BTreeMap<NaiveDate, bool>,
}

impl DailyClassification {
    /// Creates an empty classification.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            days: BTreeMap::new(),
        }
    }

    /// Records an observation for `day`.
    ///
    /// `inside` is only evaluated when the day is not already `true`.
    pub fn observe(&mut self, day: NaiveDate, inside: impl FnOnce() -> bool) {
        match self.days.entry(day) {
            Entry::Occupied(mut entry) => {
                if !*entry.get() && inside() {
                    entry.insert(true);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(inside());
            }
        }
    }

    /// Combines two classifications: the union of their days, each day
    /// `true` if it is `true` in either.
    ///
    /// Associative and commutative, with the empty classification as
    /// identity.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (day, inside) in other.days {
            *self.days.entry(day).or_insert(false) |= inside;
        }
        self
    }

    /// The value for `day`, if that day was observed.
    #[must_use]
    pub fn get(&self, day: NaiveDate) -> Option<bool> {
        self.days.get(&day).copied()
    }

    /// Number of observed days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns `true` if no day was observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// All observed days in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, bool)> + '_ {
        self.days.iter().map(|(day, inside)| (*day, *inside))
    }

    /// Observed days of `year` in ascending order.
    pub fn days_in_year(&self, year: i32) -> impl Iterator<Item = (NaiveDate, bool)> + '_ {
        let range = NaiveDate::from_ymd_opt(year, 1, 1)
            .zip(NaiveDate::from_ymd_opt(year, 12, 31))
            .map(|(first, last)| self.days.range(first..=last));
        range
            .into_iter()
            .flatten()
            .map(|(day, inside)| (*day, *inside))
    }

    /// Number of inside days in `year`.
    #[must_use]
    pub fn inside_days(&self, year: i32) -> u32 {
        let count = self.days_in_year(year).filter(|(_, inside)| *inside).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Distinct years with at least one observed day, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.days.keys().map(Datelike::year).collect();
        years.dedup();
        years
    }
}

impl FromIterator<(NaiveDate, bool)> for DailyClassification {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, bool)>>(iter: I) -> Self {
        let mut classification = Self::new();
        for (day, inside) in iter {
            classification.observe(day, || inside);
        }
        classification
    }
}
