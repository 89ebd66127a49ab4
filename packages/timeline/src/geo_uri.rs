//! Parser for `geo:` location URIs.
//!
//! Location-history exports encode coordinates as `geo:<lat>,<lon>`.
//! Only that exact two-field form is recognized.

use thiserror::Error;

const GEO_PREFIX: &str = "geo:";

/// A successfully parsed `geo:` URI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Why a location string is not a usable `geo:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoUriError {
    /// The string does not start with `geo:`.
    #[error("missing geo: prefix")]
    MissingPrefix,

    /// The coordinate part does not have exactly two comma-separated fields.
    #[error("expected 2 coordinate fields, found {found}")]
    FieldCount {
        /// Number of fields found.
        found: usize,
    },

    /// A coordinate field is not a number.
    #[error("invalid {field} value: {value:?}")]
    InvalidNumber {
        /// `"latitude"` or `"longitude"`.
        field: &'static str,
        /// The offending text.
        value: String,
    },
}

impl GeoUriError {
    /// Returns `true` when the string was not a `geo:` URI at all, as
    /// opposed to a `geo:` URI with a bad number.
    #[must_use]
    pub const fn is_unrecognized_shape(&self) -> bool {
        matches!(self, Self::MissingPrefix | Self::FieldCount { .. })
    }
}

/// Parses a `geo:<lat>,<lon>` string.
///
/// # Errors
///
/// Returns [`GeoUriError`] describing why the string could not be parsed.
pub fn parse_geo_uri(s: &str) -> Result<GeoCoordinate, GeoUriError> {
    let body = s
        .trim()
        .strip_prefix(GEO_PREFIX)
        .ok_or(GeoUriError::MissingPrefix)?;

    let fields: Vec<&str> = body.split(',').collect();
    let [lat, lon] = fields.as_slice() else {
        return Err(GeoUriError::FieldCount {
            found: fields.len(),
        });
    };

    Ok(GeoCoordinate {
        latitude: parse_field("latitude", lat)?,
        longitude: parse_field("longitude", lon)?,
    })
}

fn parse_field(field: &'static str, value: &str) -> Result<f64, GeoUriError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeoUriError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_field_uri() {
        let coord = parse_geo_uri("geo:40.7,-74.0").unwrap();
        assert!((coord.latitude - 40.7).abs() < f64::EPSILON);
        assert!((coord.longitude - -74.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let coord = parse_geo_uri("  geo:51.5074, -0.1278 ").unwrap();
        assert!((coord.latitude - 51.5074).abs() < f64::EPSILON);
        assert!((coord.longitude - -0.1278).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_missing_prefix() {
        assert_eq!(parse_geo_uri("Times Square"), Err(GeoUriError::MissingPrefix));
        assert_eq!(parse_geo_uri("40.7,-74.0"), Err(GeoUriError::MissingPrefix));
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(
            parse_geo_uri("geo:40.7"),
            Err(GeoUriError::FieldCount { found: 1 })
        );
        assert_eq!(
            parse_geo_uri("geo:40.7,-74.0,10"),
            Err(GeoUriError::FieldCount { found: 3 })
        );
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = parse_geo_uri("geo:abc,-74.0").unwrap_err();
        assert_eq!(
            err,
            GeoUriError::InvalidNumber {
                field: "latitude",
                value: "abc".to_string(),
            }
        );
        assert!(!err.is_unrecognized_shape());
        assert!(parse_geo_uri("geo:40.7,NaN").is_err());
    }
}
