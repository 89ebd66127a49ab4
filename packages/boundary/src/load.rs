//! Reading boundary datasets into a single multipolygon.
//!
//! Shapefiles are read ring by ring: each outer ring starts a new polygon
//! and the inner rings that follow it become its holes. `GeoJSON` files
//! may hold a bare geometry, a feature, or a feature collection; only
//! polygonal geometries are kept. All parts are then unioned so that
//! overlapping or adjacent shapes count as one territory.

use std::path::Path;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use geojson::GeoJson;
use shapefile::PolygonRing;

use crate::BoundaryError;

/// Reads a `.shp`, `.geojson` or `.json` boundary file and unions its
/// polygons.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the file cannot be read or parsed, has an
/// unsupported extension, or contains no polygons.
pub fn read_boundary_file(path: &Path) -> Result<MultiPolygon<f64>, BoundaryError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let parts = match extension.as_deref() {
        Some("shp") => read_shapefile(path)?,
        Some("geojson" | "json") => {
            let text = std::fs::read_to_string(path).map_err(|e| BoundaryError::io(path, e))?;
            parse_geojson_polygons(&text)?
        }
        _ => {
            return Err(BoundaryError::UnsupportedFormat {
                path: path.display().to_string(),
            });
        }
    };

    if parts.is_empty() {
        return Err(BoundaryError::NoPolygons {
            path: path.display().to_string(),
        });
    }

    log::info!("Read {} polygon parts from {}", parts.len(), path.display());
    Ok(union_polygons(&parts))
}

/// Reads every polygon shape from a shapefile.
///
/// # Errors
///
/// Returns [`BoundaryError::Shapefile`] if the file is not a polygon
/// shapefile.
pub fn read_shapefile(path: &Path) -> Result<Vec<Polygon<f64>>, BoundaryError> {
    let shapes = shapefile::read_shapes_as::<_, shapefile::Polygon>(path)?;
    Ok(shapes.iter().flat_map(shape_to_polygons).collect())
}

fn shape_to_polygons(shape: &shapefile::Polygon) -> Vec<Polygon<f64>> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();

    for ring in shape.rings() {
        let line: LineString<f64> = ring
            .points()
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();

        match ring {
            PolygonRing::Outer(_) => polygons.push(Polygon::new(line, Vec::new())),
            PolygonRing::Inner(_) => match polygons.last_mut() {
                Some(polygon) => polygon.interiors_push(line),
                None => log::warn!("Inner ring without a preceding outer ring, ignoring"),
            },
        }
    }

    polygons
}

/// Extracts all polygons from a `GeoJSON` document.
///
/// # Errors
///
/// Returns [`BoundaryError::GeoJson`] if the text is not valid `GeoJSON`.
pub fn parse_geojson_polygons(text: &str) -> Result<Vec<Polygon<f64>>, BoundaryError> {
    let geojson: GeoJson = text.parse()?;

    let geometries: Vec<geojson::Geometry> = match geojson {
        GeoJson::Geometry(geometry) => vec![geometry],
        GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(|feature| feature.geometry)
            .collect(),
    };

    let mut polygons = Vec::new();
    for geometry in geometries {
        let converted: geo::Geometry<f64> = geometry.try_into()?;
        collect_polygons(converted, &mut polygons);
    }
    Ok(polygons)
}

fn collect_polygons(geometry: geo::Geometry<f64>, out: &mut Vec<Polygon<f64>>) {
    match geometry {
        geo::Geometry::Polygon(polygon) => out.push(polygon),
        geo::Geometry::MultiPolygon(multi) => out.extend(multi.0),
        geo::Geometry::GeometryCollection(collection) => {
            for inner in collection.0 {
                collect_polygons(inner, out);
            }
        }
        other => log::debug!("Ignoring non-polygonal boundary geometry: {other:?}"),
    }
}

/// Unions polygon parts into one multipolygon.
#[must_use]
pub fn union_polygons(parts: &[Polygon<f64>]) -> MultiPolygon<f64> {
    geo::unary_union(parts)
}
