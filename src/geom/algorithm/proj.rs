use std::fmt;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use log::{debug, info, warn};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use thiserror::Error;

use crate::geom::{Boundary, Geometry3, GeometryKind, Polygon3};

/// CH1903+ / LV95, Swiss oblique Mercator on Bessel 1841 with the CH1903+ -> WGS84 shift.
pub(crate) const LV95_PROJ4: &str = "+proj=somerc +lat_0=46.9524055555556 +lon_0=7.43958333333333 \
    +k_0=1 +x_0=2600000 +y_0=1200000 +ellps=bessel +towgs84=674.374,15.056,405.346,0,0,0,0 \
    +units=m +no_defs";

/// WGS84 geographic coordinates.
pub(crate) const WGS84_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Accepted LV95 easting range in meters (area of use, rounded outward to 10 km).
pub const LV95_EASTING: (f64, f64) = (2_480_000.0, 2_840_000.0);

/// Accepted LV95 northing range in meters (area of use, rounded outward to 10 km).
pub const LV95_NORTHING: (f64, f64) = (1_070_000.0, 1_300_000.0);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("failed to build PROJ.4 definition `{definition}`: {message}")]
    Definition { definition: &'static str, message: String },

    #[error("coordinate ({x}, {y}) is outside the EPSG:2056 domain")]
    OutOfDomain { x: f64, y: f64 },

    #[error("transform of ({x}, {y}) from EPSG:2056 to EPSG:4326 failed: {message}")]
    Transform { x: f64, y: f64, message: String },

    #[error("geometry {index} is a {kind}, expected Polygon")]
    UnexpectedGeometry { index: usize, kind: GeometryKind },

    #[error("geometry {index}: {source}")]
    Geometry {
        index: usize,
        #[source]
        source: Box<ProjectionError>,
    },
}

/// What to do with non-polygon geometries in a batch conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixedGeometryPolicy {
    /// Leave them out of the output.
    #[default]
    Skip,
    /// Fail the whole call on the first one.
    Reject,
}

/// Named geographic result of a single transform.
#[derive(Debug, Clone, Copy)]
struct LatLon {
    lat: f64,
    lon: f64,
}

/// Reusable EPSG:2056 -> EPSG:4326 transformer.
pub struct Lv95ToWgs84 {
    from: Proj4,
    to: Proj4,
}

impl fmt::Debug for Lv95ToWgs84 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lv95ToWgs84").finish_non_exhaustive()
    }
}

impl Lv95ToWgs84 {
    pub fn new() -> Result<Self, ProjectionError> {
        let build = |definition: &'static str| Proj4::from_proj_string(definition)
            .map_err(|e| ProjectionError::Definition { definition, message: format!("{e:?}") });

        Ok(Self { from: build(LV95_PROJ4)?, to: build(WGS84_PROJ4)? })
    }

    /// Check that a projected coordinate is finite and inside the LV95 extent.
    #[inline]
    pub fn in_domain(x: f64, y: f64) -> bool {
        x.is_finite() && y.is_finite()
            && (LV95_EASTING.0..=LV95_EASTING.1).contains(&x)
            && (LV95_NORTHING.0..=LV95_NORTHING.1).contains(&y)
    }

    /// Run the geodetic transform on one easting/northing pair.
    fn geographic(&self, x: f64, y: f64) -> Result<LatLon, ProjectionError> {
        if !Self::in_domain(x, y) { return Err(ProjectionError::OutOfDomain { x, y }) }

        let mut point = (x, y, 0.0);
        transform(&self.from, &self.to, &mut point)
            .map_err(|e| ProjectionError::Transform { x, y, message: format!("{e:?}") })?;

        // proj4rs returns geographic output as (lon, lat) in radians.
        let (lon, lat) = (point.0.to_degrees(), point.1.to_degrees());
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjectionError::Transform { x, y, message: "non-finite result".into() })
        }
        Ok(LatLon { lat, lon })
    }

    /// Transform a single LV95 point to WGS84, returned as `(x = lon, y = lat)`.
    pub fn point(&self, coord: Coord<f64>) -> Result<Coord<f64>, ProjectionError> {
        let LatLon { lat, lon } = self.geographic(coord.x, coord.y)?;
        Ok(Coord { x: lon, y: lat })
    }

    /// Transform the exterior ring of a polygon (elevation and holes dropped),
    /// wrapped as a single-member MultiPolygon. Vertex order and count are preserved.
    pub fn polygon(&self, polygon: &Polygon3) -> Result<MultiPolygon<f64>, ProjectionError> {
        let exterior = polygon.exterior().iter()
            .map(|vertex| self.point(vertex.xy()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MultiPolygon(vec![Polygon::new(LineString(exterior), vec![])]))
    }
}

/// Fail with the first non-polygon if `policy` is `Reject`.
fn reject_mixed<'a>(geometries: impl IntoIterator<Item = &'a Geometry3>, policy: MixedGeometryPolicy) -> Result<(), ProjectionError> {
    if policy == MixedGeometryPolicy::Skip { return Ok(()) }
    match geometries.into_iter().enumerate().find(|(_, g)| g.as_polygon().is_none()) {
        Some((index, geometry)) => Err(ProjectionError::UnexpectedGeometry { index, kind: geometry.kind() }),
        None => Ok(()),
    }
}

/// Convert a sequence of LV95 geometries to WGS84 MultiPolygons, one per input polygon.
/// Non-polygon geometries follow `policy`; the first failing polygon aborts the call.
pub fn convert_3d_to_2d(geometries: &[Geometry3], policy: MixedGeometryPolicy) -> Result<Vec<MultiPolygon<f64>>, ProjectionError> {
    reject_mixed(geometries, policy)?;
    let converter = Lv95ToWgs84::new()?;

    let mut converted = Vec::with_capacity(geometries.len());
    for (index, geometry) in geometries.iter().enumerate() {
        let Some(polygon) = geometry.as_polygon() else {
            debug!("[geom::proj] skipping geometry {index} ({})", geometry.kind());
            continue
        };

        converted.push(converter.polygon(polygon)
            .map_err(|e| ProjectionError::Geometry { index, source: Box::new(e) })?);
    }

    Ok(converted)
}

/// Convert named boundaries, keeping each name with its shape. Non-polygons follow
/// `policy`; boundaries that fail to transform are logged and dropped.
pub fn convert_boundaries(boundaries: &[Boundary], policy: MixedGeometryPolicy) -> Result<Vec<(String, MultiPolygon<f64>)>, ProjectionError> {
    reject_mixed(boundaries.iter().map(|b| &b.geometry), policy)?;
    let converter = Lv95ToWgs84::new()?;

    let mut converted = Vec::with_capacity(boundaries.len());
    for (index, boundary) in boundaries.iter().enumerate() {
        let Some(polygon) = boundary.geometry.as_polygon() else {
            debug!("[geom::proj] skipping boundary {index} {:?} ({})", boundary.name, boundary.geometry.kind());
            continue
        };
        match converter.polygon(polygon) {
            Ok(shape) => converted.push((boundary.name.clone(), shape)),
            Err(e) => warn!("[geom::proj] dropping boundary {:?}: {e}", boundary.name),
        }
    }

    info!("[geom::proj] converted {} of {} boundaries", converted.len(), boundaries.len());
    Ok(converted)
}

/// Convert every polygon independently, returning `(input index, result)` pairs so the
/// caller can decide between aborting and skip-and-log. Non-polygons are skipped.
pub fn convert_each(geometries: &[Geometry3]) -> Result<Vec<(usize, Result<MultiPolygon<f64>, ProjectionError>)>, ProjectionError> {
    let converter = Lv95ToWgs84::new()?;

    Ok(geometries.iter().enumerate()
        .filter_map(|(index, geometry)| geometry.as_polygon().map(|polygon| (index, polygon)))
        .map(|(index, polygon)| (index, converter.polygon(polygon)))
        .collect())
}
