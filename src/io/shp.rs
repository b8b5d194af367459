//! Shapefile reading for boundary layers and accident point layers.

use std::path::Path;

use anyhow::{Context, Result};
use geo::Coord;
use log::{debug, info};
use shapefile::{dbase::{FieldValue, Record}, PolygonRing, Reader, Shape};

use crate::data::{Accident, DatasetLayout};
use crate::geom::{Boundary, Coord3, Geometry3, Polygon3};
use crate::io::csv::parse_year;

/// Reads all shapes + attribute records from a given `.shp` file path.
pub fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Error reading shape+record from {}", path.display()))?;
        items.push((shape, record));
    }
    Ok(items)
}

/// Render an attribute value as text; numbers without a fraction print as integers.
pub(crate) fn field_to_string(value: &FieldValue) -> Option<String> {
    let number = |v: f64| if v.fract() == 0.0 { format!("{v:.0}") } else { v.to_string() };
    match value {
        FieldValue::Character(Some(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        FieldValue::Memo(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        FieldValue::Numeric(Some(v)) => Some(number(*v)),
        FieldValue::Float(Some(v)) => Some(number(*v as f64)),
        FieldValue::Double(v) => Some(number(*v)),
        FieldValue::Integer(v) => Some(v.to_string()),
        _ => None,
    }
}

fn attribute(record: &Record, field: Option<&str>) -> Option<String> {
    record.get(field?).and_then(field_to_string)
}

/// Group Shapefile rings into polygons: each outer ring with the inner rings that follow it.
fn rings_to_geometry<P>(rings: &[PolygonRing<P>], to_coord: impl Fn(&P) -> Coord3) -> Geometry3 {
    let mut polygons: Vec<Polygon3> = Vec::new();
    let mut exterior: Option<Vec<Coord3>> = None;
    let mut holes: Vec<Vec<Coord3>> = Vec::new();

    for ring in rings {
        let coords = ring.points().iter().map(&to_coord).collect::<Vec<_>>();
        match ring {
            PolygonRing::Outer(_) => {
                // flush previous polygon
                if let Some(ext) = exterior.replace(coords) {
                    polygons.push(Polygon3::new(ext, std::mem::take(&mut holes)));
                }
            }
            PolygonRing::Inner(_) => holes.push(coords),
        }
    }
    if let Some(ext) = exterior {
        polygons.push(Polygon3::new(ext, holes));
    }

    if polygons.len() == 1 {
        Geometry3::Polygon(polygons.remove(0))
    } else {
        Geometry3::MultiPolygon(polygons)
    }
}

/// Convert a shape to a geometry, keeping elevation where the shape has it.
/// Null shapes and multipatches yield `None`.
pub(crate) fn shape_to_geometry(shape: &Shape) -> Option<Geometry3> {
    match shape {
        Shape::Point(p) => Some(Geometry3::Point(Coord3::new(p.x, p.y, 0.0))),
        Shape::PointM(p) => Some(Geometry3::Point(Coord3::new(p.x, p.y, 0.0))),
        Shape::PointZ(p) => Some(Geometry3::Point(Coord3::new(p.x, p.y, p.z))),
        Shape::Polyline(l) => Some(Geometry3::LineString(
            l.parts().iter().flatten().map(|p| Coord3::new(p.x, p.y, 0.0)).collect())),
        Shape::PolylineZ(l) => Some(Geometry3::LineString(
            l.parts().iter().flatten().map(|p| Coord3::new(p.x, p.y, p.z)).collect())),
        Shape::Polygon(p) => Some(rings_to_geometry(p.rings(), |pt| Coord3::new(pt.x, pt.y, 0.0))),
        Shape::PolygonM(p) => Some(rings_to_geometry(p.rings(), |pt| Coord3::new(pt.x, pt.y, 0.0))),
        Shape::PolygonZ(p) => Some(rings_to_geometry(p.rings(), |pt| Coord3::new(pt.x, pt.y, pt.z))),
        _ => None,
    }
}

/// Read a boundary layer, naming each feature from `name_field`.
pub fn read_boundaries(path: &Path, name_field: &str) -> Result<Vec<Boundary>> {
    let items = read_shapefile(path)?;
    let total = items.len();

    let boundaries = items.iter()
        .filter_map(|(shape, record)| {
            let Some(geometry) = shape_to_geometry(shape) else {
                debug!("[io::shp] skipping {:?} shape", shape.shapetype());
                return None
            };
            let name = attribute(record, Some(name_field)).unwrap_or_default();
            Some(Boundary { name, geometry })
        })
        .collect::<Vec<_>>();

    info!("[io::shp] read {} of {total} boundary features from {}", boundaries.len(), path.display());
    Ok(boundaries)
}

/// Read an accident point layer. Attribute names come from `layout`; non-point shapes
/// are skipped.
pub fn read_accident_points(path: &Path, layout: &DatasetLayout) -> Result<Vec<Accident>> {
    let items = read_shapefile(path)?;
    let total = items.len();

    let accidents = items.iter()
        .filter_map(|(shape, record)| {
            let Some(Geometry3::Point(point)) = shape_to_geometry(shape) else { return None };
            Some(Accident {
                location: Coord { x: point.x, y: point.y },
                year: attribute(record, layout.year.as_deref()).as_deref().and_then(parse_year),
                kind: attribute(record, layout.kind.as_deref()),
                road_type: attribute(record, layout.road_type.as_deref()),
                region: attribute(record, layout.region.as_deref()),
            })
        })
        .collect::<Vec<_>>();

    info!("[io::shp] read {} of {total} accident points from {}", accidents.len(), path.display());
    Ok(accidents)
}
