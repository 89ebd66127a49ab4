#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Location-history record types.
//!
//! [`TimelineEvent`] mirrors a single entry of a Google location-history
//! export. Only the fields needed to place an event in space and time are
//! modelled; everything else in the record is ignored during
//! deserialization.

use serde::{Deserialize, Serialize};

/// A single location-history record.
///
/// A record is a *visit* when `visit` is present, an *activity* when
/// `activity` is present, and ignored otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    /// ISO-8601 start time, kept verbatim (e.g. `"2024-03-01T09:15:00.000-05:00"`).
    #[serde(default)]
    pub start_time: Option<String>,
    /// Present for stays at a place.
    #[serde(default)]
    pub visit: Option<Visit>,
    /// Present for movement segments.
    #[serde(default)]
    pub activity: Option<Activity>,
}

/// A stay at a place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    /// The most likely place for this visit.
    #[serde(default)]
    pub top_candidate: Option<PlaceCandidate>,
}

/// A candidate place for a [`Visit`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCandidate {
    /// Location as a `geo:` URI (e.g. `"geo:40.748400,-73.985700"`).
    #[serde(default)]
    pub place_location: Option<String>,
}

/// A movement segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Start location as a `geo:` URI.
    #[serde(default)]
    pub start: Option<String>,
    /// End location as a `geo:` URI. Not used for classification.
    #[serde(default)]
    pub end: Option<String>,
}

/// The kind of a [`TimelineEvent`], derived from which fields it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Has a `visit` field.
    Visit,
    /// Has an `activity` field and no `visit` field.
    Activity,
    /// Neither.
    Other,
}

impl TimelineEvent {
    /// Returns the kind of this record. A visit wins when both fields are
    /// present.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        if self.visit.is_some() {
            EventKind::Visit
        } else if self.activity.is_some() {
            EventKind::Activity
        } else {
            EventKind::Other
        }
    }

    /// Returns the raw location string for this record, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self.kind() {
            EventKind::Visit => self
                .visit
                .as_ref()?
                .top_candidate
                .as_ref()?
                .place_location
                .as_deref(),
            EventKind::Activity => self.activity.as_ref()?.start.as_deref(),
            EventKind::Other => None,
        }
    }
}

/// A point extracted from one [`TimelineEvent`].
///
/// Any field may be absent; absence means the record cannot contribute
/// to the daily classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPoint {
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Timestamp string as found in the record, unparsed.
    pub timestamp: Option<String>,
}

impl ExtractedPoint {
    /// A point with no position, carrying only the record's timestamp.
    #[must_use]
    pub const fn without_position(timestamp: Option<String>) -> Self {
        Self {
            latitude: None,
            longitude: None,
            timestamp,
        }
    }

    /// Returns `(latitude, longitude)` when both are present.
    #[must_use]
    pub const fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_visit_record() {
        let json = r#"{
            "startTime": "2024-03-01T09:00:00.000-05:00",
            "endTime": "2024-03-01T10:00:00.000-05:00",
            "visit": {
                "hierarchyLevel": "0",
                "topCandidate": {
                    "probability": "0.91",
                    "placeID": "abc",
                    "placeLocation": "geo:40.748400,-73.985700"
                }
            }
        }"#;
        let event: TimelineEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind(), EventKind::Visit);
        assert_eq!(event.location(), Some("geo:40.748400,-73.985700"));
        assert_eq!(
            event.start_time.as_deref(),
            Some("2024-03-01T09:00:00.000-05:00")
        );
    }

    #[test]
    fn deserializes_activity_record() {
        let json = r#"{
            "startTime": "2024-03-01T11:00:00Z",
            "activity": { "start": "geo:40.7,-74.0", "end": "geo:40.8,-73.9" }
        }"#;
        let event: TimelineEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind(), EventKind::Activity);
        assert_eq!(event.location(), Some("geo:40.7,-74.0"));
    }

    #[test]
    fn other_records_have_no_location() {
        let json = r#"{ "startTime": "2024-03-01T11:00:00Z", "timelinePath": [] }"#;
        let event: TimelineEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind(), EventKind::Other);
        assert!(event.location().is_none());
    }

    #[test]
    fn visit_without_candidate_has_no_location() {
        let event = TimelineEvent {
            visit: Some(Visit::default()),
            activity: Some(Activity {
                start: Some("geo:1,2".to_string()),
                end: None,
            }),
            ..TimelineEvent::default()
        };
        assert_eq!(event.kind(), EventKind::Visit);
        assert!(event.location().is_none());
    }
}
