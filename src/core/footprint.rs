//! Footprint polygon reconstruction for Sentinel-1 products
//!
//! Modern products carry the SAFE manifest footprint as a WKT polygon, legacy
//! annotation products only carry a geolocation grid whose corners are used
//! instead. Both are then converted from the SAFE vertex order to the order
//! served by the data hub, which depends on the pass direction.

use crate::io::{XmlDocument, XmlElement};
use crate::types::{FeatureError, FeatureResult, LonLat, OrbitDirection};
use once_cell::sync::Lazy;
use regex::Regex;

pub const FOOTPRINT_ELEMENT: &str = "footprint";
pub const GRID_POINT_ELEMENT: &str = "geolocationGridPoint";

static WKT_POLYGON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*POLYGON\s*(?:Z\s*)?\(\s*\(([^()]*)\)((?:\s*,\s*\([^()]*\))*)\s*\)\s*$",
    )
    .expect("WKT polygon pattern is valid")
});

/// One sample of the legacy geolocation grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub line: i64,
    pub pixel: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl GridPoint {
    pub fn position(&self) -> LonLat {
        LonLat(self.longitude, self.latitude)
    }
}

fn geometry_error(message: impl Into<String>) -> FeatureError {
    FeatureError::GeometryExtraction(message.into())
}

fn parse_ordinate(value: &str, what: &str) -> FeatureResult<f64> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| geometry_error(format!("Unparsable {} '{}'", what, value.trim())))?;
    if !parsed.is_finite() {
        return Err(geometry_error(format!("Non-finite {} '{}'", what, value.trim())));
    }
    Ok(parsed)
}

/// Parse the outer ring of a `POLYGON ((lon lat, ...))` string.
///
/// A third ordinate is accepted and dropped. Interior rings are ignored.
pub fn parse_wkt_polygon(wkt: &str) -> FeatureResult<Vec<LonLat>> {
    let captures = WKT_POLYGON
        .captures(wkt)
        .ok_or_else(|| geometry_error(format!("Footprint is not a WKT polygon: '{}'", wkt.trim())))?;

    if captures.get(2).map_or(false, |holes| !holes.as_str().trim().is_empty()) {
        log::debug!("Ignoring interior rings of footprint polygon");
    }

    let ring = captures.get(1).map_or("", |m| m.as_str());
    ring.split(',')
        .map(|vertex| -> FeatureResult<LonLat> {
            let ordinates: Vec<&str> = vertex.split_whitespace().collect();
            match ordinates.as_slice() {
                [lon, lat] | [lon, lat, _] => Ok(LonLat(
                    parse_ordinate(lon, "longitude")?,
                    parse_ordinate(lat, "latitude")?,
                )),
                _ => Err(geometry_error(format!(
                    "Footprint vertex '{}' is not a lon/lat pair",
                    vertex.trim()
                ))),
            }
        })
        .collect()
}

/// Read the WKT footprint of a modern product
pub fn read_wkt_footprint(doc: &XmlDocument) -> FeatureResult<Vec<LonLat>> {
    let wkt = doc
        .text_of(FOOTPRINT_ELEMENT)
        .ok_or_else(|| geometry_error("Product carries no footprint"))?;
    parse_wkt_polygon(wkt)
}

fn grid_value<'a>(point: &'a XmlElement, name: &str) -> FeatureResult<&'a str> {
    point
        .child_text(name)
        .ok_or_else(|| geometry_error(format!("Geolocation grid point without {}", name)))
}

fn parse_grid_index(value: &str, what: &str) -> FeatureResult<i64> {
    value
        .parse()
        .map_err(|_| geometry_error(format!("Unparsable grid {} '{}'", what, value)))
}

/// Read every geolocation grid point of a legacy product
pub fn read_grid_points(doc: &XmlDocument) -> FeatureResult<Vec<GridPoint>> {
    let points = doc
        .find_all(GRID_POINT_ELEMENT)
        .map(|point| -> FeatureResult<GridPoint> {
            Ok(GridPoint {
                line: parse_grid_index(grid_value(point, "line")?, "line")?,
                pixel: parse_grid_index(grid_value(point, "pixel")?, "pixel")?,
                latitude: parse_ordinate(grid_value(point, "latitude")?, "latitude")?,
                longitude: parse_ordinate(grid_value(point, "longitude")?, "longitude")?,
            })
        })
        .collect::<FeatureResult<Vec<_>>>()?;

    log::debug!("Read {} geolocation grid points", points.len());
    Ok(points)
}

/// Near and far range samples of one grid line
fn line_extremes(points: &[GridPoint], line: i64) -> FeatureResult<(GridPoint, GridPoint)> {
    let row = points.iter().filter(|p| p.line == line);
    let near = row.clone().min_by_key(|p| p.pixel);
    let far = row.max_by_key(|p| p.pixel);

    match (near, far) {
        (Some(near), Some(far)) if near.pixel != far.pixel => Ok((*near, *far)),
        _ => Err(geometry_error(format!(
            "Geolocation grid line {} spans a single pixel",
            line
        ))),
    }
}

/// Corner quadrilateral of the geolocation grid, in SAFE manifest order:
/// last line near, last line far, first line far, first line near.
pub fn footprint_from_grid(points: &[GridPoint]) -> FeatureResult<Vec<LonLat>> {
    let first_line = points.iter().map(|p| p.line).min();
    let last_line = points.iter().map(|p| p.line).max();

    let (first_line, last_line) = match (first_line, last_line) {
        (Some(first), Some(last)) if first != last => (first, last),
        (Some(_), Some(_)) => {
            return Err(geometry_error("Geolocation grid spans a single line"));
        }
        _ => return Err(geometry_error("Product carries no geolocation grid points")),
    };

    let (first_near, first_far) = line_extremes(points, first_line)?;
    let (last_near, last_far) = line_extremes(points, last_line)?;

    Ok(vec![
        last_near.position(),
        last_far.position(),
        first_far.position(),
        first_near.position(),
    ])
}

/// Reject vertices outside the WGS84 longitude/latitude domain
pub fn check_bounds(ring: &[LonLat]) -> FeatureResult<()> {
    match ring
        .iter()
        .find(|v| v.lon().abs() > 180.0 || v.lat().abs() > 90.0)
    {
        Some(v) => Err(geometry_error(format!(
            "Vertex ({}, {}) is outside the lon/lat domain",
            v.lon(),
            v.lat()
        ))),
        None => Ok(()),
    }
}

/// Shoelace area in degrees², positive for counter-clockwise rings.
///
/// Longitudes are unwrapped relative to the first vertex so rings crossing
/// the antimeridian keep their orientation.
pub fn signed_area(ring: &[LonLat]) -> f64 {
    let Some(origin) = ring.first() else {
        return 0.0;
    };

    let unwrapped: Vec<(f64, f64)> = ring
        .iter()
        .map(|v| {
            let mut dlon = v.lon() - origin.lon();
            if dlon > 180.0 {
                dlon -= 360.0;
            } else if dlon < -180.0 {
                dlon += 360.0;
            }
            (dlon, v.lat())
        })
        .collect();

    let n = unwrapped.len();
    let twice_area: f64 = (0..n)
        .map(|i| {
            let (x0, y0) = unwrapped[i];
            let (x1, y1) = unwrapped[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum();
    twice_area / 2.0
}

/// Convert a SAFE footprint ring to data hub vertex order.
///
/// The ring is made counter-clockwise (reflected around its first vertex when
/// needed) and rotated so ascending passes start at the vertex after the SAFE
/// start and descending passes at the vertex before it. The result is closed.
pub fn reorder_safe_footprint(
    ring: &[LonLat],
    direction: OrbitDirection,
) -> FeatureResult<Vec<LonLat>> {
    let mut vertices = ring.to_vec();
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }

    if vertices.len() < 3 {
        return Err(geometry_error(format!(
            "Footprint needs at least 3 distinct vertices, got {}",
            vertices.len()
        )));
    }

    let area = signed_area(&vertices);
    if area.abs() < f64::EPSILON {
        return Err(geometry_error("Footprint has zero area"));
    }
    if area < 0.0 {
        vertices[1..].reverse();
    }

    let n = vertices.len();
    let offset = match direction {
        OrbitDirection::Ascending => 1,
        OrbitDirection::Descending => n - 1,
    };

    let mut reordered: Vec<LonLat> = (0..n).map(|i| vertices[(i + offset) % n]).collect();
    reordered.push(reordered[0]);
    Ok(reordered)
}
