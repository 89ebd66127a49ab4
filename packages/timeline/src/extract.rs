//! Point extraction from a single location-history record.

use residency_timeline_models::{ExtractedPoint, TimelineEvent};

use crate::geo_uri::{GeoUriError, parse_geo_uri};

/// Extracts a point from one record.
///
/// Visits read `visit.topCandidate.placeLocation`, activities read
/// `activity.start`. Location strings that are not `geo:<lat>,<lon>`
/// yield a point without a position, as do records of any other kind.
/// The timestamp is copied from `startTime` unparsed.
///
/// # Errors
///
/// Returns [`GeoUriError::InvalidNumber`] when the location is a `geo:`
/// URI whose coordinates are not numbers. Callers skip such records.
pub fn extract(event: &TimelineEvent) -> Result<ExtractedPoint, GeoUriError> {
    let timestamp = event.start_time.clone();

    let Some(location) = event.location() else {
        return Ok(ExtractedPoint::without_position(timestamp));
    };

    match parse_geo_uri(location) {
        Ok(coord) => Ok(ExtractedPoint {
            latitude: Some(coord.latitude),
            longitude: Some(coord.longitude),
            timestamp,
        }),
        Err(e) if e.is_unrecognized_shape() => Ok(ExtractedPoint::without_position(timestamp)),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use residency_timeline_models::{Activity, PlaceCandidate, Visit};

    use super::*;

    fn visit(location: &str) -> TimelineEvent {
        TimelineEvent {
            start_time: Some("2024-03-01T09:00:00Z".to_string()),
            visit: Some(Visit {
                top_candidate: Some(PlaceCandidate {
                    place_location: Some(location.to_string()),
                }),
            }),
            activity: None,
        }
    }

    #[test]
    fn extracts_visit_coordinates() {
        let point = extract(&visit("geo:40.7,-74.0")).unwrap();
        assert_eq!(point.position(), Some((40.7, -74.0)));
        assert_eq!(point.timestamp.as_deref(), Some("2024-03-01T09:00:00Z"));
    }

    #[test]
    fn non_geo_location_has_no_position() {
        let point = extract(&visit("Times Square")).unwrap();
        assert!(point.latitude.is_none());
        assert!(point.longitude.is_none());
        assert_eq!(point.timestamp.as_deref(), Some("2024-03-01T09:00:00Z"));
    }

    #[test]
    fn extracts_activity_start() {
        let event = TimelineEvent {
            start_time: Some("2024-03-02T10:00:00Z".to_string()),
            visit: None,
            activity: Some(Activity {
                start: Some("geo:48.85,2.35".to_string()),
                end: Some("geo:0,0".to_string()),
            }),
        };
        let point = extract(&event).unwrap();
        assert_eq!(point.position(), Some((48.85, 2.35)));
    }

    #[test]
    fn other_record_is_all_absent_except_time() {
        let event = TimelineEvent {
            start_time: None,
            ..TimelineEvent::default()
        };
        assert_eq!(extract(&event).unwrap(), ExtractedPoint::default());
    }

    #[test]
    fn malformed_number_is_an_error() {
        assert!(matches!(
            extract(&visit("geo:40.7,west")),
            Err(GeoUriError::InvalidNumber { field: "longitude", .. })
        ));
    }
}
