//! Prepared boundary for repeated point-in-polygon queries.
//!
//! The unioned territory is split back into its parts and each part is
//! stored in an R-tree keyed by its envelope. A query first rejects points
//! outside the overall bounding box, then tests only the parts whose
//! envelope contains the point.

use geo::{BoundingRect, Contains, MultiPolygon, Point, Polygon};
use rstar::{AABB, RTree, RTreeObject};

use crate::BoundaryError;

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Western edge.
    pub min_lon: f64,
    /// Southern edge.
    pub min_lat: f64,
    /// Eastern edge.
    pub max_lon: f64,
    /// Northern edge.
    pub max_lat: f64,
}

impl BoundingBox {
    /// Inclusive containment check.
    #[must_use]
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }
}

/// One polygon of the territory with its cached envelope.
struct PartEntry {
    envelope: AABB<[f64; 2]>,
    polygon: Polygon<f64>,
}

impl RTreeObject for PartEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// An immutable territory prepared for containment queries.
///
/// Built once per process and shared read-only through `Arc`.
pub struct PreparedBoundary {
    parts: RTree<PartEntry>,
    bounds: BoundingBox,
}

impl std::fmt::Debug for PreparedBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedBoundary")
            .field("parts", &self.parts.size())
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl PreparedBoundary {
    /// Prepares a territory.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::NoPolygons`] if `territory` is empty.
    pub fn new(territory: MultiPolygon<f64>) -> Result<Self, BoundaryError> {
        let rect = territory
            .bounding_rect()
            .ok_or_else(|| BoundaryError::NoPolygons {
                path: "<in-memory territory>".to_string(),
            })?;

        let entries: Vec<PartEntry> = territory
            .0
            .into_iter()
            .filter_map(|polygon| {
                let part = polygon.bounding_rect()?;
                Some(PartEntry {
                    envelope: AABB::from_corners(
                        [part.min().x, part.min().y],
                        [part.max().x, part.max().y],
                    ),
                    polygon,
                })
            })
            .collect();

        Ok(Self {
            parts: RTree::bulk_load(entries),
            bounds: BoundingBox {
                min_lon: rect.min().x,
                min_lat: rect.min().y,
                max_lon: rect.max().x,
                max_lat: rect.max().y,
            },
        })
    }

    /// Bounding box of the whole territory.
    #[must_use]
    pub const fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Number of polygon parts in the territory.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.size()
    }

    /// Returns `true` if the point lies strictly inside the territory.
    ///
    /// Coordinates are ordered longitude, latitude. Points exactly on a
    /// boundary edge are not contained.
    #[must_use]
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        if !self.bounds.contains(longitude, latitude) {
            return false;
        }

        let point = Point::new(longitude, latitude);
        let query = AABB::from_point([longitude, latitude]);

        self.parts
            .locate_in_envelope_intersecting(&query)
            .any(|entry| entry.polygon.contains(&point))
    }
}

#[cfg(test)]
mod tests {
    use geo::polygon;

    use super::*;

    /// Coarse continental U.S. outline plus a Hawaii-sized box.
    fn territory() -> MultiPolygon<f64> {
        MultiPolygon(vec![
            polygon![
                (x: -124.7, y: 48.4),
                (x: -124.2, y: 40.0),
                (x: -117.1, y: 32.5),
                (x: -97.1, y: 25.9),
                (x: -80.1, y: 25.2),
                (x: -81.0, y: 31.0),
                (x: -75.5, y: 35.2),
                (x: -67.0, y: 44.8),
                (x: -83.0, y: 46.0),
                (x: -95.2, y: 49.0),
                (x: -124.7, y: 48.4),
            ],
            polygon![
                (x: -160.5, y: 18.9),
                (x: -154.8, y: 18.9),
                (x: -154.8, y: 22.3),
                (x: -160.5, y: 22.3),
                (x: -160.5, y: 18.9),
            ],
        ])
    }

    #[test]
    fn contains_continental_interior() {
        let boundary = PreparedBoundary::new(territory()).unwrap();
        assert!(boundary.contains(-95.0, 39.0));
        assert!(boundary.contains(-157.8, 21.3));
    }

    #[test]
    fn rejects_points_outside_bounding_box() {
        let boundary = PreparedBoundary::new(territory()).unwrap();
        assert!(!boundary.bounding_box().contains(2.35, 48.85));
        assert!(!boundary.contains(2.35, 48.85));
    }

    #[test]
    fn rejects_points_inside_box_but_outside_polygons() {
        let boundary = PreparedBoundary::new(territory()).unwrap();
        // Gulf of Mexico
        assert!(boundary.bounding_box().contains(-90.0, 24.0));
        assert!(!boundary.contains(-90.0, 24.0));
        // Between Hawaii and California
        assert!(!boundary.contains(-140.0, 30.0));
    }

    #[test]
    fn bounding_box_spans_all_parts() {
        let boundary = PreparedBoundary::new(territory()).unwrap();
        let bbox = boundary.bounding_box();
        assert!((bbox.min_lon - -160.5).abs() < f64::EPSILON);
        assert!((bbox.max_lon - -67.0).abs() < f64::EPSILON);
        assert!((bbox.min_lat - 18.9).abs() < f64::EPSILON);
        assert!((bbox.max_lat - 49.0).abs() < f64::EPSILON);
        assert_eq!(boundary.part_count(), 2);
    }

    #[test]
    fn empty_territory_is_an_error() {
        assert!(matches!(
            PreparedBoundary::new(MultiPolygon(Vec::new())),
            Err(BoundaryError::NoPolygons { .. })
        ));
    }
}
