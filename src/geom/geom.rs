use std::fmt;

/// A projected coordinate with an elevation component (easting, northing, elevation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coord3 {
    #[inline] pub fn new(x: f64, y: f64, z: f64) -> Self { Self { x, y, z } }

    /// Drop the elevation component.
    #[inline] pub fn xy(&self) -> geo::Coord<f64> { geo::Coord { x: self.x, y: self.y } }
}

impl From<(f64, f64, f64)> for Coord3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self { Self { x, y, z } }
}

/// A polygon in projected 3D coordinates. Rings are closed (first == last).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon3 {
    exterior: Vec<Coord3>,
    interiors: Vec<Vec<Coord3>>,
}

impl Polygon3 {
    /// Build a polygon, closing any ring whose first and last vertices differ.
    pub fn new(mut exterior: Vec<Coord3>, mut interiors: Vec<Vec<Coord3>>) -> Self {
        close_ring(&mut exterior);
        interiors.iter_mut().for_each(close_ring);
        Self { exterior, interiors }
    }

    #[inline] pub fn exterior(&self) -> &[Coord3] { &self.exterior }

    #[inline] pub fn interiors(&self) -> &[Vec<Coord3>] { &self.interiors }
}

/// Ensure first and last are the same.
fn close_ring(ring: &mut Vec<Coord3>) {
    if let (Some(&first), Some(last)) = (ring.first(), ring.last()) {
        if first.x != last.x || first.y != last.y { ring.push(first) }
    }
}

/// Geometry type tag, as reported by `Geometry3::kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind { Point, LineString, Polygon, MultiPolygon }

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
        })
    }
}

/// A source geometry in a projected CRS, possibly carrying elevation.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry3 {
    Point(Coord3),
    LineString(Vec<Coord3>),
    Polygon(Polygon3),
    MultiPolygon(Vec<Polygon3>),
}

impl Geometry3 {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry3::Point(_) => GeometryKind::Point,
            Geometry3::LineString(_) => GeometryKind::LineString,
            Geometry3::Polygon(_) => GeometryKind::Polygon,
            Geometry3::MultiPolygon(_) => GeometryKind::MultiPolygon,
        }
    }

    /// Get the polygon if this is a simple polygon.
    pub fn as_polygon(&self) -> Option<&Polygon3> {
        match self {
            Geometry3::Polygon(polygon) => Some(polygon),
            _ => None,
        }
    }
}

/// A named boundary record (canton, municipality, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub name: String,
    pub geometry: Geometry3,
}

impl Boundary {
    /// Case-sensitive substring match on the name.
    #[inline] pub fn name_contains(&self, needle: &str) -> bool { self.name.contains(needle) }
}

/// Keep the boundaries whose name contains `needle`.
pub fn filter_by_name(boundaries: Vec<Boundary>, needle: &str) -> Vec<Boundary> {
    boundaries.into_iter().filter(|b| b.name_contains(needle)).collect()
}
